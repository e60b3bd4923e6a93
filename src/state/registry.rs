//! Registry - the set of attached local connections and their bindings.
//!
//! Each entry holds the sending half of its connection's outgoing queue.
//! The connection task is the only reader of that queue and the only
//! writer to the socket, so routing never touches a socket directly and no
//! lock is held across an await. Dropping an entry drops its sender, which
//! the connection task sees as a closed queue and answers by closing the
//! socket.
//!
//! All mutation goes through `&self` methods that take the write lock;
//! lookups and routing take the read lock.

use bytes::Bytes;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use super::uid::{ConnId, ConnIdGenerator};

/// Sending half of a connection's outgoing queue.
pub type Outgoing = mpsc::Sender<Bytes>;

/// Binding state of a live connection. `Closed` is represented by absence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    /// Attached, not yet bound to any channel.
    Connected,
    /// Bound to a channel or private-message peer.
    Bound(String),
}

/// Snapshot of one entry, safe to hold outside the lock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub id: ConnId,
    pub state: ConnectionState,
}

struct ConnectionEntry {
    id: ConnId,
    channel: String,
    outgoing: Outgoing,
}

impl ConnectionEntry {
    fn state(&self) -> ConnectionState {
        if self.channel.is_empty() {
            ConnectionState::Connected
        } else {
            ConnectionState::Bound(self.channel.clone())
        }
    }

    fn info(&self) -> ConnectionInfo {
        ConnectionInfo {
            id: self.id,
            state: self.state(),
        }
    }
}

/// The connection registry.
pub struct Registry {
    entries: RwLock<Vec<ConnectionEntry>>,
    ids: ConnIdGenerator,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            ids: ConnIdGenerator::new(),
        }
    }

    /// Register a new, unbound connection.
    pub fn add(&self, outgoing: Outgoing) -> ConnId {
        let id = self.ids.next();
        self.entries.write().push(ConnectionEntry {
            id,
            channel: String::new(),
            outgoing,
        });
        debug!(%id, "Connection registered");
        id
    }

    /// Bind a connection to `channel`, replacing any previous binding.
    ///
    /// Returns false if the connection is no longer registered.
    pub fn bind(&self, id: ConnId, channel: impl Into<String>) -> bool {
        let channel = channel.into();
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                debug!(%id, from = %entry.channel, to = %channel, "Connection bound");
                entry.channel = channel;
                true
            }
            None => false,
        }
    }

    /// Current state of a connection, `None` once it is closed.
    pub fn state_of(&self, id: ConnId) -> Option<ConnectionState> {
        self.entries
            .read()
            .iter()
            .find(|entry| entry.id == id)
            .map(ConnectionEntry::state)
    }

    /// First connection bound to `channel`.
    pub fn lookup_by_channel(&self, channel: &str) -> Option<ConnectionInfo> {
        if channel.is_empty() {
            return None;
        }
        self.entries
            .read()
            .iter()
            .find(|entry| entry.channel == channel)
            .map(ConnectionEntry::info)
    }

    /// Whether any local client currently cares about `channel`.
    pub fn has_channel(&self, channel: &str) -> bool {
        self.lookup_by_channel(channel).is_some()
    }

    /// Queue `data` to every connection bound to `channel`.
    ///
    /// Returns the bytes queued across all matches. An empty channel name
    /// matches nothing: unbound connections are reached only by
    /// [`Registry::write_all`].
    pub fn write_to_channel(&self, channel: &str, data: &Bytes) -> usize {
        if channel.is_empty() {
            return 0;
        }
        self.write_where(|entry| entry.channel == channel, data)
    }

    /// Queue `data` to one connection.
    pub fn write_to(&self, id: ConnId, data: &Bytes) -> usize {
        self.write_where(|entry| entry.id == id, data)
    }

    /// Queue `data` to every connection.
    pub fn write_all(&self, data: &Bytes) -> usize {
        self.write_where(|_| true, data)
    }

    fn write_where(&self, matches: impl Fn(&ConnectionEntry) -> bool, data: &Bytes) -> usize {
        let mut written = 0;
        let mut failed = Vec::new();

        for entry in self.entries.read().iter().filter(|entry| matches(entry)) {
            match entry.outgoing.try_send(data.clone()) {
                Ok(()) => written += data.len(),
                Err(TrySendError::Full(_)) => {
                    warn!(id = %entry.id, channel = %entry.channel, "Outgoing queue full - dropping connection");
                    failed.push(entry.id);
                }
                Err(TrySendError::Closed(_)) => failed.push(entry.id),
            }
        }

        for id in failed {
            self.remove(id);
        }
        written
    }

    /// Remove exactly one connection, closing its socket.
    ///
    /// Other connections, including ones bound to the same channel, are
    /// untouched. Returns false if it was already gone.
    pub fn remove(&self, id: ConnId) -> bool {
        let removed = {
            let mut entries = self.entries.write();
            entries
                .iter()
                .position(|entry| entry.id == id)
                .map(|pos| entries.remove(pos))
        };
        match removed {
            Some(entry) => {
                debug!(%id, channel = %entry.channel, "Connection removed");
                true
            }
            None => false,
        }
    }

    /// Remove every connection. Returns how many were closed.
    pub fn close_all(&self) -> usize {
        let closed = std::mem::take(&mut *self.entries.write());
        closed.len()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
