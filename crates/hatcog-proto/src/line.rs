//! Line-based codec for tokio.
//!
//! Reads newline-terminated UTF-8 lines (CR/LF stripped) and writes lines
//! terminated with CRLF, as the upstream server expects.
//!
//! A line that is too long or not UTF-8 is dropped on its own: the decoder
//! yields it as a [`Line`] error and resumes at the next newline, so the
//! stream stays readable. Only I/O failures end the stream.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{ProtocolError, Result};

/// Default maximum line length in bytes, terminator included.
pub const MAX_LINE_LEN: usize = 512;

/// One decoded line, or the reason it was dropped.
pub type Line = std::result::Result<String, ProtocolError>;

/// Line-based codec that handles newline-terminated text.
#[derive(Debug, Clone)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Skipping the tail of an overlong line
    discarding: bool,
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl LineCodec {
    /// Create a codec limited to [`MAX_LINE_LEN`] bytes per line.
    pub fn new() -> Self {
        Self::with_max_len(MAX_LINE_LEN)
    }

    /// Create a codec with a custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// Maximum accepted line length.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Cut outgoing text at its first line break so one call writes one line.
    pub fn truncate_line(data: &str) -> &str {
        match data.find(['\r', '\n']) {
            Some(pos) => &data[..pos],
            None => data,
        }
    }

    fn too_long(&self, actual: usize) -> ProtocolError {
        ProtocolError::LineTooLong {
            actual,
            limit: self.max_len,
        }
    }
}

impl Decoder for LineCodec {
    type Item = Line;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Line>> {
        loop {
            let newline = src[self.next_index..]
                .iter()
                .position(|b| *b == b'\n')
                .map(|offset| self.next_index + offset);

            match (self.discarding, newline) {
                (true, Some(pos)) => {
                    src.advance(pos + 1);
                    self.next_index = 0;
                    self.discarding = false;
                }
                (true, None) => {
                    src.advance(src.len());
                    self.next_index = 0;
                    return Ok(None);
                }
                (false, Some(pos)) => {
                    let line = src.split_to(pos + 1);
                    self.next_index = 0;

                    if line.len() > self.max_len {
                        return Ok(Some(Err(self.too_long(line.len()))));
                    }

                    let line = match std::str::from_utf8(&line) {
                        Ok(text) => Ok(text.trim_end_matches(['\r', '\n']).to_owned()),
                        Err(e) => Err(ProtocolError::InvalidUtf8 {
                            byte_pos: e.valid_up_to(),
                        }),
                    };
                    return Ok(Some(line));
                }
                (false, None) if src.len() > self.max_len => {
                    // The rest of this line is dropped as it arrives.
                    let seen = src.len();
                    src.advance(seen);
                    self.next_index = 0;
                    self.discarding = true;
                    return Ok(Some(Err(self.too_long(seen))));
                }
                (false, None) => {
                    self.next_index = src.len();
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Line>> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            // A final unterminated line is still a line.
            None if !src.is_empty() => {
                src.put_u8(b'\n');
                self.decode(src)
            }
            None => Ok(None),
        }
    }
}

impl<T: AsRef<str>> Encoder<T> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: T, dst: &mut BytesMut) -> Result<()> {
        let line = Self::truncate_line(line.as_ref());
        dst.reserve(line.len() + 2);
        dst.put_slice(line.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}
