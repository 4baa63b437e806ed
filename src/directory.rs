//! Advisory directory of last known key locations
//!
//! The directory caches where a key was last observed. Backends stay
//! authoritative for existence and TTL; a stale entry only costs an extra
//! failed probe before the fallback scan takes over, so entries are never
//! actively pruned.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Mapping from key to the shard index last known to hold it
///
/// Mutated concurrently by every successful write and fallback hit, so the
/// map lives behind a lock.
#[derive(Debug, Default)]
pub struct ShardDirectory {
    entries: RwLock<HashMap<String, usize>>,
}

impl ShardDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the last known shard for a key
    pub fn lookup(&self, key: &str) -> Option<usize> {
        self.entries.read().get(key).copied()
    }

    /// Record the shard a key was just observed on
    ///
    /// Always overwrites any prior entry; last writer wins, which is fine
    /// for a purely advisory cache.
    pub fn record(&self, key: &str, shard: usize) {
        self.entries.write().insert(key.to_string(), shard);
    }

    /// Drop the entry for a key, returning its last known shard if any
    pub fn forget(&self, key: &str) -> Option<usize> {
        self.entries.write().remove(key)
    }

    /// Number of keys with a recorded location
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the directory holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
