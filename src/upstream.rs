//! Upstream bridge - the single connection to the chat server.
//!
//! The bridge registers, answers keepalive pings itself, hands every other
//! line to the dispatch loop and writes the dispatch loop's outgoing lines.
//! When the link drops it reports [`UpstreamEvent::Lost`] and stops; there
//! is no reconnect.
//!
//! Reading and writing run as two halves of one task, so a read waiting on
//! a full event queue never holds up the outgoing queue. Keepalive replies
//! reach the write half over their own small queue.

use futures_util::{SinkExt, StreamExt};
use hatcog_proto::command::{NICK, PING, PONG};
use hatcog_proto::LineCodec;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, instrument, warn};

use crate::config::UpstreamConfig;
use crate::error::DaemonError;

/// Pending keepalive replies.
const PONG_QUEUE: usize = 8;

/// What the bridge reports to the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamEvent {
    /// One raw protocol line, terminator stripped.
    Line(String),
    /// The link is gone.
    Lost(String),
}

/// A registered upstream connection.
pub struct Upstream {
    addr: String,
    reader: FramedRead<OwnedReadHalf, LineCodec>,
    writer: FramedWrite<OwnedWriteHalf, LineCodec>,
}

impl Upstream {
    /// Connect and send the registration lines.
    pub async fn connect(config: &UpstreamConfig, max_line_len: usize) -> Result<Self, DaemonError> {
        let stream = TcpStream::connect(&config.address).await.map_err(|source| {
            DaemonError::UpstreamConnect {
                addr: config.address.clone(),
                source,
            }
        })?;
        info!(addr = %config.address, "Connected upstream");

        let (read_half, write_half) = stream.into_split();
        let reader = FramedRead::new(read_half, LineCodec::with_max_len(max_line_len));
        let mut writer = FramedWrite::new(write_half, LineCodec::with_max_len(max_line_len));
        let registration = [
            format!("{NICK} {}", config.nick),
            format!("USER {} 0 * :{}", config.username(), config.realname()),
        ];
        for line in registration {
            writer
                .send(line)
                .await
                .map_err(|e| DaemonError::UpstreamLost(e.to_string()))?;
        }

        Ok(Self {
            addr: config.address.clone(),
            reader,
            writer,
        })
    }

    /// Pump lines both ways until the link drops or the dispatch loop goes away.
    #[instrument(skip_all, fields(addr = %self.addr), name = "upstream")]
    pub async fn run(self, events: mpsc::Sender<UpstreamEvent>, outgoing: mpsc::Receiver<String>) {
        let (pong_tx, pong_rx) = mpsc::channel(PONG_QUEUE);

        let lost = tokio::select! {
            lost = read_lines(self.reader, &events, pong_tx) => lost,
            lost = write_lines(self.writer, outgoing, pong_rx) => lost,
        };

        match lost {
            Some(reason) => {
                warn!(%reason, "Upstream connection lost");
                let _ = events.send(UpstreamEvent::Lost(reason)).await;
            }
            None => debug!("Dispatch loop gone - stopping"),
        }
    }
}

/// Read half. Returns the loss reason, or `None` once the dispatch loop is gone.
async fn read_lines(
    mut reader: FramedRead<OwnedReadHalf, LineCodec>,
    events: &mpsc::Sender<UpstreamEvent>,
    pongs: mpsc::Sender<String>,
) -> Option<String> {
    loop {
        match reader.next().await {
            Some(Ok(Ok(line))) => {
                if let Some(pong) = pong_for(&line) {
                    debug!(%line, "Answering keepalive");
                    if pongs.send(pong).await.is_err() {
                        return None;
                    }
                    continue;
                }
                if events.send(UpstreamEvent::Line(line)).await.is_err() {
                    return None;
                }
            }
            Some(Ok(Err(e))) => debug!(error = %e, "Dropping unreadable upstream line"),
            Some(Err(e)) => return Some(e.to_string()),
            None => return Some("connection closed by server".to_string()),
        }
    }
}

/// Write half: dispatch output and keepalive replies, in arrival order.
async fn write_lines(
    mut writer: FramedWrite<OwnedWriteHalf, LineCodec>,
    mut outgoing: mpsc::Receiver<String>,
    mut pongs: mpsc::Receiver<String>,
) -> Option<String> {
    loop {
        let line = tokio::select! {
            Some(pong) = pongs.recv() => pong,
            line = outgoing.recv() => match line {
                Some(line) => {
                    debug!(%line, "Sending upstream");
                    line
                }
                None => return None,
            },
        };
        if let Err(e) = writer.send(line).await {
            return Some(e.to_string());
        }
    }
}

/// The reply to a server keepalive, or `None` for any other line.
fn pong_for(line: &str) -> Option<String> {
    let rest = line.strip_prefix(PING)?;
    if rest.is_empty() || rest.starts_with(' ') {
        Some(format!("{PONG}{rest}"))
    } else {
        None
    }
}
