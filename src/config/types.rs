//! Core configuration types and loading.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

use super::defaults::{
    default_event_queue, default_listen_address, default_max_line_len, default_outgoing_queue,
};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Daemon configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Daemon identity.
    pub daemon: DaemonConfig,
    /// Local listener configuration.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Upstream server connection.
    pub upstream: UpstreamConfig,
    /// Line and queue limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Daemon identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    /// Logical network name stamped on every relayed message (e.g., "libera").
    pub network: String,
}

/// Local listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to. Loopback by convention: no client authentication
    /// is performed.
    #[serde(default = "default_listen_address")]
    pub address: SocketAddr,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_listen_address(),
        }
    }
}

/// Upstream server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Server address as `host:port`; resolved at connect time.
    pub address: String,
    /// Nickname to register with.
    pub nick: String,
    /// Username sent in USER (defaults to the nickname).
    #[serde(default)]
    pub username: Option<String>,
    /// Real name sent in USER (defaults to the nickname).
    #[serde(default)]
    pub realname: Option<String>,
}

impl UpstreamConfig {
    /// Username for the USER line.
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.nick)
    }

    /// Real name for the USER line.
    pub fn realname(&self) -> &str {
        self.realname.as_deref().unwrap_or(&self.nick)
    }
}

/// Line length and queue depth limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum line length accepted from upstream and from local clients.
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    /// Records buffered per local connection before it counts as stalled.
    #[serde(default = "default_outgoing_queue")]
    pub outgoing_queue: usize,
    /// Depth of the dispatch loop's inbound queues.
    #[serde(default = "default_event_queue")]
    pub event_queue: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_len: default_max_line_len(),
            outgoing_queue: default_outgoing_queue(),
            event_queue: default_event_queue(),
        }
    }
}
