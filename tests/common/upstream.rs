//! Fake upstream chat server.
//!
//! Accepts the daemon's single connection and lets a test script both
//! sides of the conversation line by line.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio::time::timeout;

/// A listening fake server.
pub struct FakeUpstream {
    listener: TcpListener,
}

impl FakeUpstream {
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Ok(Self { listener })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept the daemon and consume its NICK/USER registration.
    pub async fn accept(&self) -> anyhow::Result<UpstreamSession> {
        let (stream, _) = timeout(Duration::from_secs(10), self.listener.accept()).await??;
        let (read_half, write_half) = stream.into_split();
        let mut session = UpstreamSession {
            lines: BufReader::new(read_half).lines(),
            writer: Some(write_half),
        };

        let nick = session.recv().await?;
        anyhow::ensure!(nick.starts_with("NICK "), "expected NICK, got {nick:?}");
        let user = session.recv().await?;
        anyhow::ensure!(user.starts_with("USER "), "expected USER, got {user:?}");
        Ok(session)
    }
}

/// The daemon's connection as seen by the fake server.
pub struct UpstreamSession {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: Option<OwnedWriteHalf>,
}

impl UpstreamSession {
    /// Send one protocol line (CRLF appended).
    pub async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("session closed"))?;
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\r\n").await?;
        writer.flush().await?;
        Ok(())
    }

    /// Next line from the daemon.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        match timeout(dur, self.lines.next_line()).await?? {
            Some(line) => Ok(line),
            None => anyhow::bail!("daemon closed the upstream connection"),
        }
    }

    /// Assert the daemon sends nothing for `dur`.
    pub async fn expect_silence(&mut self, dur: Duration) -> anyhow::Result<()> {
        match timeout(dur, self.lines.next_line()).await {
            Err(_) => Ok(()),
            Ok(line) => anyhow::bail!("expected silence, got {line:?}"),
        }
    }

    /// Drop the connection as a crashed server would.
    pub fn close(&mut self) {
        self.writer = None;
    }
}
