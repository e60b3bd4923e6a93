//! Error types for the hatcog protocol library.
//!
//! Parse failures are per-line and never fatal: callers log them and drop
//! the offending line. [`ProtocolError`] wraps them together with the
//! framing and encoding failures raised by the tokio codecs.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Why a line was rejected as malformed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum MalformedKind {
    /// A `:prefix` was present but nothing followed it.
    PrefixWithoutCommand,
    /// The prefix contained more than one `!` separator.
    AmbiguousPrefix,
    /// No command token could be found.
    EmptyCommand,
    /// A CTCP `ACTION` carried no text.
    EmptyAction,
}

impl MalformedKind {
    /// Static label, suitable for log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PrefixWithoutCommand => "prefix without command",
            Self::AmbiguousPrefix => "ambiguous user/host prefix",
            Self::EmptyCommand => "empty command",
            Self::EmptyAction => "action without text",
        }
    }
}

impl std::fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by [`crate::parse`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The sanitized line was two bytes or shorter.
    #[error("line too short")]
    TooShort,

    /// The line did not follow the wire grammar.
    #[error("malformed line: {0}")]
    Malformed(MalformedKind),
}

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Line was not valid UTF-8.
    #[error("invalid UTF-8 in line at byte {byte_pos}")]
    InvalidUtf8 {
        /// Byte position where UTF-8 validation failed.
        byte_pos: usize,
    },

    /// Line exceeded the maximum allowed length.
    #[error("line too long: {actual} bytes (limit: {limit})")]
    LineTooLong {
        /// Actual line length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// Line could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Record could not be encoded or decoded.
    #[error("record error: {0}")]
    Record(#[from] serde_json::Error),
}

impl ProtocolError {
    /// Whether the stream can keep being read after this error.
    ///
    /// Everything but I/O spoils a single line. The line codec resyncs at
    /// the next newline after an overlong or non-UTF-8 line.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}
