//! Network module.
//!
//! Contains the Gateway (local TCP listener) and the per-connection handler.

mod connection;
mod gateway;

pub use connection::{Connection, LocalEvent};
pub use gateway::Gateway;
