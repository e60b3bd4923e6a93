//! Unified error handling for hatcogd.
//!
//! Line-level parse failures live in `hatcog_proto`; this module covers the
//! daemon's own failure classes and how far each one is allowed to spread.

use hatcog_proto::ProtocolError;
use std::net::SocketAddr;
use thiserror::Error;

use crate::state::ConnId;

// ============================================================================
// Daemon Errors
// ============================================================================

/// Errors that end a task.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// The local listening socket is unusable. Fatal: no client can be served.
    #[error("local listener failure on {addr}: {source}")]
    ListenerFailure {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// One local connection failed. Only that connection is closed.
    #[error("connection {id} i/o error: {source}")]
    ConnectionIo {
        id: ConnId,
        #[source]
        source: ProtocolError,
    },

    /// Could not reach the upstream server.
    #[error("upstream connect to {addr} failed: {source}")]
    UpstreamConnect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The upstream link dropped after it was established.
    #[error("upstream connection lost: {0}")]
    UpstreamLost(String),
}

impl DaemonError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ListenerFailure { .. } => "listener_failure",
            Self::ConnectionIo { .. } => "connection_io",
            Self::UpstreamConnect { .. } => "upstream_connect",
            Self::UpstreamLost(_) => "upstream_lost",
        }
    }

    /// Whether the daemon must stop.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::ConnectionIo { .. })
    }
}
