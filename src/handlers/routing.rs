//! Where an upstream message goes.

use hatcog_proto::command::{is_channel, is_conversation, NICK, QUIT, RPL_WELCOME};
use hatcog_proto::Message;

/// Delivery target for one upstream message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Every attached connection.
    All,
    /// Connections bound to this channel or peer.
    Channel(String),
}

/// Pick the delivery target.
///
/// `NICK` and `QUIT` concern every channel the user shares with us, and the
/// daemon does not track membership, so they go everywhere.
pub fn route(msg: &Message) -> Route {
    if msg.command == NICK || msg.command == QUIT || msg.channel.is_empty() {
        Route::All
    } else {
        Route::Channel(msg.channel.clone())
    }
}

/// The daemon's new nickname, if this message changes it.
pub fn nick_update(msg: &Message, current: &str) -> Option<String> {
    let nick = if msg.command == RPL_WELCOME {
        msg.args.first()?
    } else if msg.command == NICK && (msg.user.is_empty() || msg.user == current) {
        if msg.content.is_empty() {
            msg.args.first()?
        } else {
            &msg.content
        }
    } else {
        return None;
    };
    (!nick.is_empty() && nick.as_str() != current).then(|| nick.clone())
}

/// A message addressed to us personally (not a channel).
pub fn is_private_conversation(msg: &Message) -> bool {
    is_conversation(&msg.command) && !msg.channel.is_empty() && !is_channel(&msg.channel)
}
