//! State management module.
//!
//! Contains the connection Registry and connection ids.

mod registry;
mod uid;

pub use registry::{ConnectionState, Registry};
pub use uid::ConnId;
