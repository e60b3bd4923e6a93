//! Connection - Handles an individual local client connection.
//!
//! Each Connection runs in its own Tokio task:
//!
//! ```text
//!    ┌──────────────────────────────────────────────┐
//!    │              Connection Task                 │
//!    │                                              │
//!    │  FramedRead<LineCodec> ──▶ LocalEvent::Line ─┼──▶ dispatch loop
//!    │                                              │
//!    │  outgoing queue ─────────▶ FramedWrite ──────┼──▶ socket
//!    │  (filled by Registry)                        │
//!    └──────────────────────────────────────────────┘
//! ```
//!
//! The task never touches the registry. It reports what it reads and, on
//! exit, that it closed; the dispatch loop owns the bookkeeping.
//!
//! Reading and writing are separate halves of the task: records keep
//! flowing out while a read waits on the event queue. A line that is too
//! long or not UTF-8 is dropped and the connection stays open.

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use hatcog_proto::LineCodec;
use std::net::SocketAddr;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{BytesCodec, FramedRead, FramedWrite};
use tracing::{debug, info, instrument};

use crate::error::DaemonError;
use crate::state::ConnId;

/// What a connection task reports to the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalEvent {
    /// A line of text from a local client.
    Line { id: ConnId, text: String },
    /// The connection is gone; its registry entry should be removed.
    Closed { id: ConnId },
}

/// A local client connection handler.
pub struct Connection {
    id: ConnId,
    addr: SocketAddr,
    stream: TcpStream,
    outgoing: mpsc::Receiver<Bytes>,
    events: mpsc::Sender<LocalEvent>,
    max_line_len: usize,
}

impl Connection {
    /// Create a new connection handler.
    pub fn new(
        id: ConnId,
        stream: TcpStream,
        addr: SocketAddr,
        outgoing: mpsc::Receiver<Bytes>,
        events: mpsc::Sender<LocalEvent>,
        max_line_len: usize,
    ) -> Self {
        Self {
            id,
            addr,
            stream,
            outgoing,
            events,
            max_line_len,
        }
    }

    /// Run the connection until the client leaves, an I/O error occurs, or
    /// the registry drops this connection's entry.
    #[instrument(skip(self), fields(id = %self.id, addr = %self.addr), name = "connection")]
    pub async fn run(mut self) -> Result<(), DaemonError> {
        info!("Client attached");

        let id = self.id;
        let (read_half, write_half) = self.stream.into_split();
        let reader = FramedRead::new(read_half, LineCodec::with_max_len(self.max_line_len));
        let writer = FramedWrite::new(write_half, BytesCodec::new());

        let result = tokio::select! {
            result = read_lines(id, reader, &self.events) => result,
            result = write_records(id, writer, &mut self.outgoing) => result,
        };

        let _ = self.events.send(LocalEvent::Closed { id }).await;
        result
    }
}

async fn read_lines(
    id: ConnId,
    mut reader: FramedRead<OwnedReadHalf, LineCodec>,
    events: &mpsc::Sender<LocalEvent>,
) -> Result<(), DaemonError> {
    loop {
        match reader.next().await {
            Some(Ok(Ok(text))) => {
                debug!(%text, "Received line");
                if events.send(LocalEvent::Line { id, text }).await.is_err() {
                    // Dispatch loop is gone: daemon is shutting down.
                    return Ok(());
                }
            }
            Some(Ok(Err(e))) => debug!(error = %e, "Dropping unreadable line"),
            Some(Err(source)) => return Err(DaemonError::ConnectionIo { id, source }),
            None => {
                info!("Client disconnected");
                return Ok(());
            }
        }
    }
}

async fn write_records(
    id: ConnId,
    mut writer: FramedWrite<OwnedWriteHalf, BytesCodec>,
    outgoing: &mut mpsc::Receiver<Bytes>,
) -> Result<(), DaemonError> {
    while let Some(record) = outgoing.recv().await {
        writer
            .send(record)
            .await
            .map_err(|source| DaemonError::ConnectionIo { id, source: source.into() })?;
    }
    debug!("Unregistered - closing");
    Ok(())
}
