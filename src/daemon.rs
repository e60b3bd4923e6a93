//! The dispatch loop.
//!
//! One task owns the routing state (current nickname, undelivered private
//! messages) and serves both inbound queues: lines from the upstream bridge
//! and lines from local connections. Neither queue has priority.

use bytes::Bytes;
use hatcog_proto::{parse, Message};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::error::DaemonError;
use crate::handlers::{is_private_conversation, nick_update, route, Directive, Route};
use crate::network::LocalEvent;
use crate::state::{ConnId, ConnectionState, Registry};
use crate::upstream::UpstreamEvent;

/// Routing state plus the handles it routes through.
pub struct Daemon {
    registry: Arc<Registry>,
    network: String,
    nick: String,
    /// Last private message per peer that arrived while no client was bound to it.
    last_private: HashMap<String, Bytes>,
    upstream: mpsc::Sender<String>,
}

impl Daemon {
    pub fn new(
        registry: Arc<Registry>,
        network: impl Into<String>,
        nick: impl Into<String>,
        upstream: mpsc::Sender<String>,
    ) -> Self {
        Self {
            registry,
            network: network.into(),
            nick: nick.into(),
            last_private: HashMap::new(),
            upstream,
        }
    }

    /// Current nickname as last reported by the server.
    #[cfg(test)]
    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Serve both queues until the upstream link is lost.
    ///
    /// Returns `Ok` only if every local event sender is gone.
    #[instrument(skip_all, fields(network = %self.network), name = "dispatch")]
    pub async fn run(
        mut self,
        mut upstream_events: mpsc::Receiver<UpstreamEvent>,
        mut local_events: mpsc::Receiver<LocalEvent>,
    ) -> Result<(), DaemonError> {
        loop {
            tokio::select! {
                event = upstream_events.recv() => match event {
                    Some(UpstreamEvent::Line(line)) => self.handle_upstream(&line),
                    Some(UpstreamEvent::Lost(reason)) => return Err(self.upstream_lost(reason)),
                    None => return Err(self.upstream_lost("upstream bridge stopped".to_string())),
                },

                event = local_events.recv() => match event {
                    Some(LocalEvent::Line { id, text }) => self.handle_local(id, &text).await,
                    Some(LocalEvent::Closed { id }) => {
                        self.registry.remove(id);
                    }
                    None => return Ok(()),
                },
            }
        }
    }

    /// Route one upstream line to local clients.
    pub fn handle_upstream(&mut self, line: &str) {
        let msg = match parse(line) {
            Ok(msg) => msg.with_network(self.network.as_str()),
            Err(e) => {
                debug!(%line, error = %e, "Dropping unparseable upstream line");
                return;
            }
        };

        if let Some(nick) = nick_update(&msg, &self.nick) {
            info!(old = %self.nick, new = %nick, "Nickname changed");
            self.nick = nick;
        }

        let Some(record) = self.encode(&msg) else {
            return;
        };

        match route(&msg) {
            Route::All => {
                self.registry.write_all(&record);
            }
            Route::Channel(channel) => {
                if self.registry.has_channel(&channel) {
                    self.registry.write_to_channel(&channel, &record);
                } else if is_private_conversation(&msg) {
                    info!(peer = %channel, text = %msg.content, "Private message with no client attached");
                    self.last_private.insert(channel, record);
                }
            }
        }
    }

    /// Act on one line from a local client.
    pub async fn handle_local(&mut self, id: ConnId, line: &str) {
        let Some(directive) = Directive::parse(line) else {
            return;
        };
        let bound = match self.registry.state_of(id) {
            Some(ConnectionState::Bound(channel)) => Some(channel),
            Some(ConnectionState::Connected) => None,
            None => return,
        };

        match &directive {
            Directive::Join(channel) => {
                self.registry.bind(id, channel.as_str());
                self.reply_nick(id);
            }
            Directive::Private(peer) => {
                self.registry.bind(id, peer.as_str());
                self.reply_nick(id);
                if let Some(record) = self.last_private.remove(peer) {
                    self.registry.write_to(id, &record);
                }
            }
            Directive::Quit => {
                debug!(%id, "Local quit");
                self.registry.remove(id);
                return;
            }
            _ => {}
        }

        if directive.needs_binding() && bound.is_none() {
            debug!(%id, %line, "Dropping text from unbound connection");
            return;
        }
        if let Some(out) = directive.upstream_line(bound.as_deref())
            && self.upstream.send(out).await.is_err()
        {
            warn!(%id, "Upstream bridge gone - line dropped");
        }
    }

    fn reply_nick(&self, id: ConnId) {
        let msg = Message::nick(self.nick.as_str()).with_network(self.network.as_str());
        if let Some(record) = self.encode(&msg) {
            self.registry.write_to(id, &record);
        }
    }

    fn upstream_lost(&self, reason: String) -> DaemonError {
        let notice = Message::notice(format!("upstream connection lost: {reason}"))
            .with_network(self.network.as_str());
        if let Some(record) = self.encode(&notice) {
            self.registry.write_all(&record);
        }
        DaemonError::UpstreamLost(reason)
    }

    fn encode(&self, msg: &Message) -> Option<Bytes> {
        match msg.to_record() {
            Ok(record) => Some(Bytes::from(record)),
            Err(e) => {
                warn!(command = %msg.command, error = %e, "Failed to encode record");
                None
            }
        }
    }
}
