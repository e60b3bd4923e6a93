//! Per-command special cases of the wire format.
//!
//! Each table is an ordered list of rules. The parser applies the first
//! rule whose predicate matches and ignores the rest, so order matters.

use crate::command::{JOIN, PRIVMSG, RPL_AWAY};
use crate::ctcp::{Ctcp, CtcpKind};
use crate::error::{MalformedKind, ParseError};
use crate::message::Message;

/// A `(predicate -> transform)` entry.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Name used in logs and tests.
    pub name: &'static str,
    /// Whether the rule applies to this message.
    pub applies: fn(&Message) -> bool,
    /// Rewrite the message in place.
    pub apply: fn(&mut Message) -> Result<(), ParseError>,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Channel inference, consulted only when no arg names a channel.
pub const CHANNEL_RULES: &[Rule] = &[
    Rule {
        name: "private-message-peer",
        applies: is_privmsg,
        apply: channel_from_user,
    },
    Rule {
        name: "join-trailing",
        applies: is_join,
        apply: channel_from_content,
    },
    Rule {
        name: "away-subject",
        applies: is_away_reply,
        apply: channel_from_away_subject,
    },
];

/// CTCP rewrites, applied to every parsed line.
pub const CONTENT_RULES: &[Rule] = &[
    Rule {
        name: "ctcp-action",
        applies: is_action,
        apply: rewrite_action,
    },
    Rule {
        name: "ctcp-version",
        applies: is_version,
        apply: rewrite_version,
    },
];

/// Apply the first matching rule of `rules`, returning its name.
pub fn apply_first(
    rules: &'static [Rule],
    msg: &mut Message,
) -> Result<Option<&'static str>, ParseError> {
    match rules.iter().find(|rule| (rule.applies)(msg)) {
        Some(rule) => {
            (rule.apply)(msg)?;
            Ok(Some(rule.name))
        }
        None => Ok(None),
    }
}

fn is_privmsg(msg: &Message) -> bool {
    msg.command == PRIVMSG
}

fn channel_from_user(msg: &mut Message) -> Result<(), ParseError> {
    msg.channel = msg.user.clone();
    Ok(())
}

fn is_join(msg: &Message) -> bool {
    msg.command == JOIN
}

fn channel_from_content(msg: &mut Message) -> Result<(), ParseError> {
    msg.channel = msg.content.clone();
    Ok(())
}

// `:server 301 me alice :gone fishing`: the away user is the second arg.
fn is_away_reply(msg: &Message) -> bool {
    msg.command == RPL_AWAY && msg.args.len() >= 2
}

fn channel_from_away_subject(msg: &mut Message) -> Result<(), ParseError> {
    msg.user = msg.args[1].clone();
    msg.channel = msg.user.clone();
    Ok(())
}

fn is_action(msg: &Message) -> bool {
    Ctcp::from_body(&msg.content).kind == CtcpKind::Action
}

fn rewrite_action(msg: &mut Message) -> Result<(), ParseError> {
    let text = Ctcp::from_body(&msg.content)
        .params
        .ok_or(ParseError::Malformed(MalformedKind::EmptyAction))?
        .to_owned();
    msg.command = CtcpKind::Action.to_string();
    msg.content = text;
    Ok(())
}

fn is_version(msg: &Message) -> bool {
    Ctcp::from_body(&msg.content).kind == CtcpKind::Version
}

fn rewrite_version(msg: &mut Message) -> Result<(), ParseError> {
    msg.command = CtcpKind::Version.to_string();
    msg.content.clear();
    Ok(())
}
