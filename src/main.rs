//! hatcogd - chat relay daemon.
//!
//! Holds one upstream chat-server connection and fans its traffic out to
//! thin local clients, one per channel or private conversation.

mod config;
mod daemon;
mod error;
mod handlers;
mod network;
mod state;
mod upstream;

use crate::config::{validate, Config};
use crate::daemon::Daemon;
use crate::network::Gateway;
use crate::state::Registry;
use crate::upstream::Upstream;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Time connection tasks get to flush queued records after `close_all`.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "hatcogd.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(path = %config_path, error = %e, "Invalid config");
        }
        return Err(anyhow::anyhow!(
            "{} configuration error(s) in {config_path}",
            errors.len()
        ));
    }

    info!(
        network = %config.daemon.network,
        upstream = %config.upstream.address,
        "Starting hatcogd"
    );

    let limits = config.limits.clone();
    let (upstream_event_tx, upstream_event_rx) = mpsc::channel(limits.event_queue);
    let (upstream_out_tx, upstream_out_rx) = mpsc::channel(limits.event_queue);
    let (local_event_tx, local_event_rx) = mpsc::channel(limits.event_queue);

    let upstream = Upstream::connect(&config.upstream, limits.max_line_len).await?;
    tokio::spawn(upstream.run(upstream_event_tx, upstream_out_rx));

    let registry = Arc::new(Registry::new());
    let gateway = Gateway::bind(
        config.listen.address,
        Arc::clone(&registry),
        local_event_tx,
        limits,
    )
    .await?;
    info!(listen = %gateway.local_addr(), "Accepting local clients");

    let daemon = Daemon::new(
        Arc::clone(&registry),
        config.daemon.network.as_str(),
        config.upstream.nick.as_str(),
        upstream_out_tx,
    );

    // Whichever finishes first wins; dropping the gateway future closes the listener.
    let result = tokio::select! {
        res = gateway.run() => res,
        res = daemon.run(upstream_event_rx, local_event_rx) => res,
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                warn!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown requested");
            Ok(())
        }
    };

    let closed = registry.close_all();
    info!(closed, "Local connections closed");
    if closed > 0 {
        tokio::time::sleep(SHUTDOWN_GRACE).await;
    }

    if let Err(e) = result {
        error!(error = %e, code = e.error_code(), fatal = e.is_fatal(), "hatcogd stopping");
        return Err(e.into());
    }
    Ok(())
}
