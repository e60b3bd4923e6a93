//! Gateway - the local TCP listener that accepts thin clients.
//!
//! Every accepted socket gets an outgoing queue, a registry entry with no
//! channel binding, and its own [`Connection`] task.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

use crate::config::LimitsConfig;
use crate::error::DaemonError;
use crate::network::{Connection, LocalEvent};
use crate::state::Registry;

/// The Gateway accepts incoming local connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    addr: SocketAddr,
    registry: Arc<Registry>,
    events: mpsc::Sender<LocalEvent>,
    limits: LimitsConfig,
}

impl Gateway {
    /// Bind the gateway to the specified address.
    pub async fn bind(
        addr: SocketAddr,
        registry: Arc<Registry>,
        events: mpsc::Sender<LocalEvent>,
        limits: LimitsConfig,
    ) -> Result<Self, DaemonError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| DaemonError::ListenerFailure { addr, source })?;
        let addr = listener
            .local_addr()
            .map_err(|source| DaemonError::ListenerFailure { addr, source })?;

        if !addr.ip().is_loopback() {
            warn!(%addr, "Local listener is not loopback - any host can attach without authentication");
        }
        info!(%addr, "Local listener bound");

        Ok(Self {
            listener,
            addr,
            registry,
            events,
            limits,
        })
    }

    /// The bound address (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the gateway, accepting connections until the listener fails.
    ///
    /// Dropping the returned future closes the listening socket.
    #[instrument(skip(self), fields(addr = %self.addr), name = "gateway")]
    pub async fn run(self) -> Result<(), DaemonError> {
        loop {
            let (stream, peer) = self
                .listener
                .accept()
                .await
                .map_err(|source| DaemonError::ListenerFailure {
                    addr: self.addr,
                    source,
                })?;

            if let Err(e) = stream.set_nodelay(true) {
                warn!(%peer, error = %e, "Failed to set TCP_NODELAY");
            }

            let (outgoing_tx, outgoing_rx) = mpsc::channel(self.limits.outgoing_queue);
            let id = self.registry.add(outgoing_tx);
            info!(%id, %peer, "Local connection accepted");

            let connection = Connection::new(
                id,
                stream,
                peer,
                outgoing_rx,
                self.events.clone(),
                self.limits.max_line_len,
            );
            tokio::spawn(async move {
                if let Err(e) = connection.run().await {
                    warn!(%id, %peer, error = %e, code = e.error_code(), "Local connection error");
                }
                info!(%id, %peer, "Local connection closed");
            });
        }
    }
}
