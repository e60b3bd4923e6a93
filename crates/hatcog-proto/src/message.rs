//! The decoded message type and its record encoding.
//!
//! Local clients receive one JSON record per line. Field names are the ones
//! existing thin clients read (`Network`, `Raw`, `Received`, ...), so the
//! serde attributes below are part of the wire contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::command::{NICK, NOTICE};
use crate::error::ProtocolError;

/// Record delimiter between daemon and local clients.
pub const RECORD_DELIM: u8 = b'\n';

/// A decoded protocol line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Message {
    /// Logical name of the upstream server; filled by the daemon, not the parser.
    pub network: String,
    /// Sanitized wire text.
    pub raw: String,
    /// Capture time.
    #[serde(rename = "Received")]
    pub received_at: DateTime<Utc>,
    /// Originating nickname, empty if none.
    pub user: String,
    /// Originating host, empty if none.
    pub host: String,
    /// Protocol verb or numeric. Never empty for a parsed line.
    pub command: String,
    /// Positional parameters, trailing segment excluded.
    pub args: Vec<String>,
    /// Trailing segment, empty if absent.
    pub content: String,
    /// Whether the trailing segment arrived as a CTCP body.
    #[serde(rename = "IsCTCP")]
    pub is_ctcp: bool,
    /// Target channel or private-message peer.
    pub channel: String,
}

impl Message {
    /// An empty message with only a command, stamped now.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            network: String::new(),
            raw: String::new(),
            received_at: Utc::now(),
            user: String::new(),
            host: String::new(),
            command: command.into(),
            args: Vec::new(),
            content: String::new(),
            is_ctcp: false,
            channel: String::new(),
        }
    }

    /// A daemon-originated notice for local clients.
    ///
    /// ```
    /// use hatcog_proto::Message;
    ///
    /// let msg = Message::notice("upstream connection lost");
    /// assert_eq!(msg.command, "NOTICE");
    /// assert_eq!(msg.content, "upstream connection lost");
    /// ```
    pub fn notice(text: impl Into<String>) -> Self {
        let mut msg = Self::new(NOTICE);
        msg.content = text.into();
        msg
    }

    /// Tell a local client which nickname the daemon is using.
    ///
    /// The user field is left empty, which clients read as "this is you".
    pub fn nick(nick: impl Into<String>) -> Self {
        let mut msg = Self::new(NICK);
        msg.content = nick.into();
        msg
    }

    /// Set the network name.
    #[must_use]
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = network.into();
        self
    }

    /// Set the channel.
    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// Encode as a newline-terminated record.
    pub fn to_record(&self) -> Result<Vec<u8>, ProtocolError> {
        serialize(self)
    }

    /// Decode one record, with or without its trailing delimiter.
    pub fn from_record(record: &[u8]) -> Result<Self, ProtocolError> {
        let record = record.strip_suffix(b"\r\n").unwrap_or(record);
        let record = record.strip_suffix(&[RECORD_DELIM]).unwrap_or(record);
        Ok(serde_json::from_slice(record)?)
    }
}

/// Encode a message as one newline-terminated JSON record.
pub fn serialize(msg: &Message) -> Result<Vec<u8>, ProtocolError> {
    let mut data = serde_json::to_vec(msg)?;
    data.push(RECORD_DELIM);
    Ok(data)
}
