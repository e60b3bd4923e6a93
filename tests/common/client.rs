//! Test local client.
//!
//! Speaks the daemon's local protocol: text lines out, JSON records in.

use futures_util::StreamExt;
use hatcog_proto::{Message, RecordCodec};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::codec::FramedRead;

/// A thin local client.
pub struct TestClient {
    reader: FramedRead<OwnedReadHalf, RecordCodec>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: FramedRead::new(read_half, RecordCodec::new()),
            writer: write_half,
        })
    }

    /// Send one text line.
    pub async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive one record.
    pub async fn recv(&mut self) -> anyhow::Result<Message> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Message> {
        match timeout(dur, self.reader.next()).await? {
            Some(record) => Ok(record?),
            None => anyhow::bail!("daemon closed the connection"),
        }
    }

    /// Assert no record arrives for `dur`.
    pub async fn expect_silence(&mut self, dur: Duration) -> anyhow::Result<()> {
        match self.recv_timeout(dur).await {
            Ok(msg) => anyhow::bail!("expected silence, got {} {:?}", msg.command, msg.content),
            Err(e) if e.is::<tokio::time::error::Elapsed>() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Wait for the daemon to close this connection.
    pub async fn expect_closed(&mut self) -> anyhow::Result<()> {
        loop {
            match timeout(Duration::from_secs(5), self.reader.next()).await? {
                Some(record) => {
                    record?;
                }
                None => return Ok(()),
            }
        }
    }

    /// `/join` and wait for the nickname reply, which marks the binding as done.
    pub async fn join(&mut self, channel: &str) -> anyhow::Result<Message> {
        self.send(&format!("/join {channel}")).await?;
        self.expect_nick_reply().await
    }

    /// `/private` and wait for the nickname reply.
    pub async fn private(&mut self, peer: &str) -> anyhow::Result<Message> {
        self.send(&format!("/private {peer}")).await?;
        self.expect_nick_reply().await
    }

    async fn expect_nick_reply(&mut self) -> anyhow::Result<Message> {
        let msg = self.recv().await?;
        anyhow::ensure!(
            msg.command == "NICK" && msg.user.is_empty(),
            "expected nickname reply, got {} {:?}",
            msg.command,
            msg.content
        );
        Ok(msg)
    }
}
