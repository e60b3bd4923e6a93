//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions and TOML loading
//! - [`defaults`]: serde default values
//! - [`validation`]: startup checks that collect every error at once

mod defaults;
mod types;
mod validation;

pub use types::{Config, LimitsConfig, UpstreamConfig};
pub use validation::validate;
