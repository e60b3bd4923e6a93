//! CTCP (Client-to-Client Protocol) bodies.
//!
//! CTCP requests travel inside the trailing segment of a `PRIVMSG`,
//! wrapped in `\x01` markers. The parser only needs to recognise the
//! leading token; outgoing `/me` lines need an `ACTION` body built.
//!
//! # Example
//!
//! ```
//! use hatcog_proto::ctcp::{Ctcp, CtcpKind};
//!
//! let ctcp = Ctcp::parse("\x01ACTION waves hello\x01").unwrap();
//! assert_eq!(ctcp.kind, CtcpKind::Action);
//! assert_eq!(ctcp.params, Some("waves hello"));
//!
//! assert_eq!(Ctcp::action("dances").to_string(), "\x01ACTION dances\x01");
//! ```

use std::fmt;

/// The CTCP delimiter character (`\x01`).
pub const CTCP_DELIM: char = '\x01';

/// CTCP command types the relay treats specially.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CtcpKind {
    /// `ACTION`, sent by `/me`.
    Action,
    /// `VERSION` request.
    Version,
    /// Anything else, passed through untouched.
    Unknown(String),
}

impl CtcpKind {
    /// Classify a CTCP token. Matching is exact: `action` is not `ACTION`.
    pub fn parse(name: &str) -> Self {
        match name {
            "ACTION" => Self::Action,
            "VERSION" => Self::Version,
            _ => Self::Unknown(name.to_owned()),
        }
    }

    /// Canonical token.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Action => "ACTION",
            Self::Version => "VERSION",
            Self::Unknown(s) => s,
        }
    }
}

impl fmt::Display for CtcpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CTCP body split into its token and parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ctcp<'a> {
    /// The CTCP command type.
    pub kind: CtcpKind,
    /// Text following the token, if any.
    pub params: Option<&'a str>,
}

impl<'a> Ctcp<'a> {
    /// Parse a delimited body (`\x01TOKEN params\x01`).
    ///
    /// Returns `None` if the text does not start with the delimiter or is empty.
    pub fn parse(text: &'a str) -> Option<Self> {
        let text = text.strip_prefix(CTCP_DELIM)?;
        let text = text.strip_suffix(CTCP_DELIM).unwrap_or(text);
        if text.is_empty() {
            return None;
        }
        Some(Self::from_body(text))
    }

    /// Split an already-unwrapped body on its first space.
    pub fn from_body(body: &'a str) -> Self {
        let (token, params) = match body.split_once(' ') {
            Some((token, rest)) => (token, (!rest.is_empty()).then_some(rest)),
            None => (body, None),
        };
        Self {
            kind: CtcpKind::parse(token),
            params,
        }
    }

    /// Check whether a trailing segment carries a CTCP body.
    #[inline]
    pub fn is_ctcp(text: &str) -> bool {
        text.starts_with(CTCP_DELIM)
    }

    /// Build an `ACTION` body.
    pub fn action(text: &'a str) -> Self {
        Self {
            kind: CtcpKind::Action,
            params: Some(text),
        }
    }
}

impl fmt::Display for Ctcp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.params {
            Some(params) => write!(f, "{CTCP_DELIM}{} {params}{CTCP_DELIM}", self.kind),
            None => write!(f, "{CTCP_DELIM}{}{CTCP_DELIM}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_without_params() {
        let ctcp = Ctcp::parse("\x01VERSION\x01").unwrap();
        assert_eq!(ctcp.kind, CtcpKind::Version);
        assert_eq!(ctcp.params, None);
    }

    #[test]
    fn test_parse_requires_delimiter() {
        assert!(Ctcp::parse("ACTION waves").is_none());
        assert!(Ctcp::parse("\x01\x01").is_none());
    }

    #[test]
    fn test_from_body_trailing_space_has_no_params() {
        let ctcp = Ctcp::from_body("ACTION ");
        assert_eq!(ctcp.kind, CtcpKind::Action);
        assert_eq!(ctcp.params, None);
    }

    #[test]
    fn test_kind_is_case_sensitive() {
        assert_eq!(
            CtcpKind::parse("action"),
            CtcpKind::Unknown("action".to_string())
        );
    }

    #[test]
    fn test_unknown_roundtrip() {
        let ctcp = Ctcp::from_body("PING 12345");
        assert_eq!(ctcp.to_string(), "\x01PING 12345\x01");
    }
}
