//! Line normalization.
//!
//! Servers pad lines with CR/LF and CTCP bodies arrive wrapped in `\x01`
//! markers. Both are stripped from the ends of a line before parsing, and
//! again from the trailing segment once its CTCP flag has been recorded.

/// Returns true if the character is stripped from the ends of a line.
///
/// # Examples
///
/// ```
/// use hatcog_proto::format::is_edge_noise;
///
/// assert!(is_edge_noise('\r'));
/// assert!(is_edge_noise('\x01'));
/// assert!(is_edge_noise(' '));
/// assert!(!is_edge_noise('a'));
/// ```
#[inline]
pub fn is_edge_noise(ch: char) -> bool {
    ch.is_whitespace() || ch.is_control()
}

/// Strip whitespace, line terminators and control characters from both ends.
///
/// # Examples
///
/// ```
/// use hatcog_proto::format::sanitize;
///
/// assert_eq!(sanitize("PING :irc.example.com\r\n"), "PING :irc.example.com");
/// assert_eq!(sanitize("\x01ACTION waves\x01"), "ACTION waves");
/// ```
#[inline]
pub fn sanitize(data: &str) -> &str {
    data.trim_matches(is_edge_noise)
}
