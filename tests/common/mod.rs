//! Integration test common infrastructure.
//!
//! Provides a fake upstream server, a way to spawn the daemon binary
//! against it, and a thin local client that reads records.

pub mod client;
pub mod server;
pub mod upstream;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::TestDaemon;
#[allow(unused_imports)]
pub use upstream::{FakeUpstream, UpstreamSession};
