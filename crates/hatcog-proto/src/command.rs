//! Command vocabulary the daemon special-cases.
//!
//! Everything outside this list passes through the parser with generic
//! field population.

/// Private or channel message.
pub const PRIVMSG: &str = "PRIVMSG";
/// Notice; also used for daemon-originated notices to local clients.
pub const NOTICE: &str = "NOTICE";
/// Channel join.
pub const JOIN: &str = "JOIN";
/// Channel part.
pub const PART: &str = "PART";
/// User quit.
pub const QUIT: &str = "QUIT";
/// Nickname change.
pub const NICK: &str = "NICK";
/// Server keepalive probe.
pub const PING: &str = "PING";
/// Keepalive answer.
pub const PONG: &str = "PONG";
/// Channel names listing request.
pub const NAMES: &str = "NAMES";
/// Topic query.
pub const TOPIC: &str = "TOPIC";
/// Rewritten command for CTCP actions (`/me`).
pub const ACTION: &str = "ACTION";
/// Rewritten command for CTCP version requests.
pub const VERSION: &str = "VERSION";

/// `001`: registration accepted; first arg is our nickname.
pub const RPL_WELCOME: &str = "001";
/// `301`: away reply; second arg is the away user.
pub const RPL_AWAY: &str = "301";
/// `332`: channel topic.
pub const RPL_TOPIC: &str = "332";
/// `353`: names list.
pub const RPL_NAMREPLY: &str = "353";
/// `421`: unknown command.
pub const ERR_UNKNOWNCOMMAND: &str = "421";

/// Marker that starts a channel name.
pub const CHANNEL_PREFIX: char = '#';

/// Whether `target` names a channel rather than a private-message peer.
#[inline]
pub fn is_channel(target: &str) -> bool {
    target.starts_with(CHANNEL_PREFIX)
}

/// Whether the command carries conversation text.
#[inline]
pub fn is_conversation(command: &str) -> bool {
    matches!(command, PRIVMSG | ACTION)
}
