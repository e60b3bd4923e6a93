//! Connection identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one local connection for the daemon's lifetime.
///
/// Ids are never reused, so a stale id can only ever miss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnId(u64);

impl ConnId {
    /// Wrap a raw id. Ids handed out by [`ConnIdGenerator`] start at 1.
    #[cfg(test)]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Hands out monotonically increasing [`ConnId`]s.
#[derive(Debug)]
pub struct ConnIdGenerator {
    counter: AtomicU64,
}

impl Default for ConnIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnIdGenerator {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(1),
        }
    }

    /// Generate the next unique id.
    pub fn next(&self) -> ConnId {
        ConnId(self.counter.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let generator = ConnIdGenerator::new();
        assert_eq!(generator.next(), ConnId::from_raw(1));
        assert_eq!(generator.next(), ConnId::from_raw(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(ConnId::from_raw(42).to_string(), "c42");
    }
}
