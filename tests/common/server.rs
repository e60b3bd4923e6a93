//! Test daemon management.
//!
//! Spawns hatcogd instances for integration testing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

use super::client::TestClient;
use super::upstream::{FakeUpstream, UpstreamSession};

/// A running daemon process.
pub struct TestDaemon {
    child: Child,
    listen: SocketAddr,
    _dir: TempDir,
}

impl TestDaemon {
    /// Spawn a daemon pointed at `upstream`, wait for it to register and
    /// to accept local clients.
    pub async fn start(upstream: &FakeUpstream) -> anyhow::Result<(Self, UpstreamSession)> {
        let listen = free_local_addr()?;
        let config = format!(
            r#"
[daemon]
network = "testnet"

[listen]
address = "{listen}"

[upstream]
address = "{}"
nick = "hatcog"
realname = "Test Relay"

[limits]
outgoing_queue = 64
"#,
            upstream.addr()?
        );

        let daemon = Self::spawn_with_config(&config, listen)?;
        let session = upstream.accept().await?;
        daemon.wait_until_ready().await?;
        Ok((daemon, session))
    }

    /// Spawn the binary with an arbitrary config. Does not wait for readiness.
    pub fn spawn_with_config(config: &str, listen: SocketAddr) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let config_path: PathBuf = dir.path().join("hatcogd.toml");
        std::fs::write(&config_path, config)?;

        let child = Command::new(env!("CARGO_BIN_EXE_hatcogd"))
            .arg(&config_path)
            .env("RUST_LOG", "hatcogd=debug")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        Ok(Self {
            child,
            listen,
            _dir: dir,
        })
    }

    /// Wait until the daemon is accepting local connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(self.listen).await.is_ok() {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("daemon failed to start within 5 seconds")
    }

    /// Attach a new local client.
    pub async fn connect(&self) -> anyhow::Result<TestClient> {
        TestClient::connect(self.listen).await
    }

    /// Wait for the process to exit on its own.
    pub async fn wait_exit(&mut self, dur: Duration) -> anyhow::Result<ExitStatus> {
        let polls = dur.as_millis() / 50 + 1;
        for _ in 0..polls {
            if let Some(status) = self.child.try_wait()? {
                return Ok(status);
            }
            sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("daemon still running after {dur:?}")
    }
}

impl Drop for TestDaemon {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Reserve a loopback port by binding and releasing it.
pub fn free_local_addr() -> anyhow::Result<SocketAddr> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?)
}
