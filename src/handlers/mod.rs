//! Message handling.
//!
//! Pure decisions for the dispatch loop: how a client line becomes an
//! upstream line, and where an upstream message is delivered.

mod directive;
mod routing;

pub use directive::Directive;
pub use routing::{is_private_conversation, nick_update, route, Route};
