//! Raw line to [`Message`].
//!
//! ```text
//! [':' prefix SPACE] command {SPACE arg} [SPACE ':' trailing]
//! prefix = user '!' host | host
//! ```

use std::str::FromStr;

use chrono::Utc;

use crate::command::is_channel;
use crate::ctcp::Ctcp;
use crate::error::{MalformedKind, ParseError};
use crate::format::sanitize;
use crate::message::Message;
use crate::rules::{apply_first, CHANNEL_RULES, CONTENT_RULES};

const PREFIX_MARKER: char = ':';
const USER_HOST_SEPARATOR: char = '!';
const TRAILING_MARKER: &str = " :";

/// Parse one line received from the upstream server.
///
/// The returned message has an empty `network`; the daemon fills it in.
///
/// # Example
///
/// ```
/// use hatcog_proto::parse;
///
/// let msg = parse(":alice!al@example.com PRIVMSG #rust :hello there\r\n").unwrap();
/// assert_eq!(msg.user, "alice");
/// assert_eq!(msg.command, "PRIVMSG");
/// assert_eq!(msg.args, vec!["#rust"]);
/// assert_eq!(msg.content, "hello there");
/// assert_eq!(msg.channel, "#rust");
/// ```
pub fn parse(data: &str) -> Result<Message, ParseError> {
    let data = sanitize(data);
    if data.len() <= 2 {
        return Err(ParseError::TooShort);
    }
    let raw = data;

    let (user, host, rest) = match data.strip_prefix(PREFIX_MARKER) {
        Some(prefixed) => {
            let (prefix, rest) = prefixed
                .split_once(' ')
                .ok_or(ParseError::Malformed(MalformedKind::PrefixWithoutCommand))?;
            let (user, host) = split_prefix(prefix)?;
            (user, host, rest)
        }
        None => ("", "", data),
    };

    let (arg_str, trailing) = rest.split_once(TRAILING_MARKER).unwrap_or((rest, ""));
    let is_ctcp = Ctcp::is_ctcp(trailing);
    let content = sanitize(trailing);

    let mut tokens = arg_str.split(' ').filter(|token| !token.is_empty());
    let command = tokens
        .next()
        .ok_or(ParseError::Malformed(MalformedKind::EmptyCommand))?;
    let args: Vec<String> = tokens.map(str::to_owned).collect();

    let channel = args
        .iter()
        .find(|arg| is_channel(arg))
        .cloned()
        .unwrap_or_default();

    let mut msg = Message {
        network: String::new(),
        raw: raw.to_owned(),
        received_at: Utc::now(),
        user: user.to_owned(),
        host: host.to_owned(),
        command: command.to_owned(),
        args,
        content: content.to_owned(),
        is_ctcp,
        channel,
    };

    if msg.channel.is_empty() {
        apply_first(CHANNEL_RULES, &mut msg)?;
    }
    apply_first(CONTENT_RULES, &mut msg)?;

    Ok(msg)
}

/// `nick!ident@host` splits into user and host; anything else is all host.
fn split_prefix(prefix: &str) -> Result<(&str, &str), ParseError> {
    if !prefix.contains(USER_HOST_SEPARATOR) {
        return Ok(("", prefix));
    }
    let mut parts = prefix.split(USER_HOST_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(user), Some(host), None) => Ok((user, host)),
        _ => Err(ParseError::Malformed(MalformedKind::AmbiguousPrefix)),
    }
}

impl FromStr for Message {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        parse(s)
    }
}
