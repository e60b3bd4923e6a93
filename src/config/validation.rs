//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("daemon.network is required")]
    MissingNetworkName,
    #[error("upstream.address is required")]
    MissingUpstreamAddress,
    #[error("upstream.address must be host:port, got '{0}'")]
    InvalidUpstreamAddress(String),
    #[error("upstream.nick is required")]
    MissingNick,
    #[error("upstream.nick must not contain spaces, ':' or '!', got '{0}'")]
    InvalidNick(String),
    #[error("limits.{0} must be greater than zero")]
    ZeroLimit(&'static str),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.daemon.network.is_empty() {
        errors.push(ValidationError::MissingNetworkName);
    }

    let address = &config.upstream.address;
    if address.is_empty() {
        errors.push(ValidationError::MissingUpstreamAddress);
    } else if !address
        .rsplit_once(':')
        .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok())
    {
        errors.push(ValidationError::InvalidUpstreamAddress(address.clone()));
    }

    let nick = &config.upstream.nick;
    if nick.is_empty() {
        errors.push(ValidationError::MissingNick);
    } else if nick.contains([' ', ':', '!']) {
        errors.push(ValidationError::InvalidNick(nick.clone()));
    }

    let limits = &config.limits;
    for (name, value) in [
        ("max_line_len", limits.max_line_len),
        ("outgoing_queue", limits.outgoing_queue),
        ("event_queue", limits.event_queue),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroLimit(name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
