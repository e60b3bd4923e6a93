//! Record codec for tokio.
//!
//! Frames the daemon-to-client stream: one JSON-encoded [`Message`] per
//! newline-terminated line.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{ProtocolError, Result};
use crate::line::LineCodec;
use crate::message::{serialize, Message};

/// Default maximum record length in bytes.
///
/// A record carries the raw line plus its decoded fields, so it is several
/// times larger than the line it came from.
pub const MAX_RECORD_LEN: usize = 16 * 1024;

/// Tokio codec for encoding/decoding [`Message`] records.
///
/// Wraps [`LineCodec`] and decodes each line as JSON. Unlike the line
/// codec, a bad record is returned as the decode error itself.
#[derive(Debug, Clone)]
pub struct RecordCodec {
    inner: LineCodec,
}

impl Default for RecordCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordCodec {
    /// Create a codec limited to [`MAX_RECORD_LEN`] bytes per record.
    pub fn new() -> Self {
        Self::with_max_len(MAX_RECORD_LEN)
    }

    /// Create a codec with a custom max record length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            inner: LineCodec::with_max_len(max_len),
        }
    }
}

impl Decoder for RecordCodec {
    type Item = Message;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Message>> {
        match self.inner.decode(src)? {
            Some(line) => Message::from_record(line?.as_bytes()).map(Some),
            None => Ok(None),
        }
    }
}

impl Encoder<&Message> for RecordCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: &Message, dst: &mut BytesMut) -> Result<()> {
        let record = serialize(msg)?;
        dst.reserve(record.len());
        dst.put_slice(&record);
        Ok(())
    }
}
