//! Local directives: the text lines thin clients send to the daemon.
//!
//! A client speaks in slash commands and plain text. Most of it turns into
//! one upstream line; a few directives (`/private`, `/quit`) only change
//! local state.

use hatcog_proto::command::{JOIN, NAMES, PART, PRIVMSG, TOPIC};
use hatcog_proto::format::sanitize;
use hatcog_proto::Ctcp;

/// One parsed client line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `/join #chan`: bind and join upstream.
    Join(String),
    /// `/private peer` or `/query peer`: bind to a private-message peer.
    Private(String),
    /// `/quit`: close this connection only.
    Quit,
    /// `/me text`: a CTCP ACTION to the bound target.
    Me(String),
    /// `/part`, `/names`, `/topic` with no arguments: scoped to the binding.
    Scoped(&'static str),
    /// Any other slash command, already rewritten as an upstream line.
    Raw(String),
    /// Plain text for the bound target.
    Say(String),
}

impl Directive {
    /// Parse a client line. Blank lines (and a bare `/me` or `/`) yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = sanitize(line);
        if line.is_empty() {
            return None;
        }

        let Some(command) = line.strip_prefix('/') else {
            return Some(Self::Say(line.to_owned()));
        };
        let (verb, rest) = match command.split_once(' ') {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (command, ""),
        };
        if verb.is_empty() {
            return None;
        }
        let target = rest.split(' ').next().unwrap_or_default();

        let directive = match (verb.to_ascii_lowercase().as_str(), rest) {
            ("quit", _) => Self::Quit,
            ("me", "") => return None,
            ("me", text) => Self::Me(text.to_owned()),
            ("join", r) if !r.is_empty() => Self::Join(target.to_owned()),
            ("private" | "query", r) if !r.is_empty() => Self::Private(target.to_owned()),
            ("part", "") => Self::Scoped(PART),
            ("names", "") => Self::Scoped(NAMES),
            ("topic", "") => Self::Scoped(TOPIC),
            (_, "") => Self::Raw(verb.to_ascii_uppercase()),
            (_, r) => Self::Raw(format!("{} {}", verb.to_ascii_uppercase(), r)),
        };
        Some(directive)
    }

    /// Whether this directive means nothing without a bound target.
    pub fn needs_binding(&self) -> bool {
        matches!(self, Self::Me(_) | Self::Say(_))
    }

    /// The line to send upstream, if any, given the connection's binding.
    pub fn upstream_line(&self, bound: Option<&str>) -> Option<String> {
        match self {
            Self::Join(channel) => Some(format!("{JOIN} {channel}")),
            Self::Private(_) | Self::Quit => None,
            Self::Me(text) => {
                bound.map(|target| format!("{PRIVMSG} {target} :{}", Ctcp::action(text)))
            }
            Self::Scoped(verb) => Some(match bound {
                Some(target) => format!("{verb} {target}"),
                None => (*verb).to_owned(),
            }),
            Self::Raw(line) => Some(line.clone()),
            Self::Say(text) => bound.map(|target| format!("{PRIVMSG} {target} :{text}")),
        }
    }
}
