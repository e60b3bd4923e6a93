//! # hatcog-proto
//!
//! Line parser and record codec for the hatcog relay daemon.
//!
//! The upstream side speaks plain IRC lines. [`parse`] turns one of those
//! into a flat [`Message`], resolving which channel (or private-message
//! peer) it belongs to. [`serialize`] turns a message into the
//! newline-terminated JSON record that local clients read.
//!
//! ## Quick Start
//!
//! ```rust
//! use hatcog_proto::{parse, serialize};
//!
//! let msg = parse(":alice!al@example.com PRIVMSG bob :\x01ACTION waves\x01").unwrap();
//! assert_eq!(msg.command, "ACTION");
//! assert_eq!(msg.content, "waves");
//! assert_eq!(msg.channel, "alice");
//!
//! let record = serialize(&msg.with_network("libera")).unwrap();
//! assert!(record.ends_with(b"\n"));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod ctcp;
pub mod error;
pub mod format;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
mod parse;
#[cfg(feature = "tokio")]
pub mod record;
pub mod rules;

pub use self::ctcp::{Ctcp, CtcpKind};
pub use self::error::{MalformedKind, ParseError, ProtocolError};
#[cfg(feature = "tokio")]
pub use self::line::{Line, LineCodec, MAX_LINE_LEN};
pub use self::message::{serialize, Message};
pub use self::parse::parse;
#[cfg(feature = "tokio")]
pub use self::record::{RecordCodec, MAX_RECORD_LEN};
