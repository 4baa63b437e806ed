//! Backend shard abstraction
//!
//! Each shard is one independent key-value store reached through a minimal
//! protocol: get, set with optional expiry, delete, and a full key
//! enumeration used only during the startup directory scan. One backend
//! session is created per configured endpoint at process start and shared
//! by all callers for the life of the process.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::Result;

/// A single backend shard speaking the minimal key-value protocol
pub trait ShardBackend: Send + Sync {
    /// Fetch the raw byte value stored under `key`, if present
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, optionally expiring after `ttl`
    ///
    /// Without a TTL the value persists until explicitly deleted or evicted
    /// by the backend itself.
    fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Remove `key`, returning whether a value was actually removed
    fn delete(&self, key: &str) -> Result<bool>;

    /// Enumerate every key currently stored on this shard
    ///
    /// Startup-only: the directory scan is the sole caller. Cost is linear
    /// in the shard's key count.
    fn keys(&self) -> Result<Vec<String>>;
}

struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if deadline <= now)
    }
}

/// In-process backend honoring TTLs, used as the reference implementation
/// and by tests
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    /// Whether the backend holds no live entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ShardBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get(key) {
            if entry.is_expired(Instant::now()) {
                entries.remove(key);
                return Ok(None);
            }
            return Ok(Some(entry.value.clone()));
        }
        Ok(None)
    }

    fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let entry = Entry {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.entries.lock().insert(key.to_string(), entry);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.lock();
        match entries.remove(key) {
            Some(entry) => Ok(!entry.is_expired(Instant::now())),
            None => Ok(false),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| !entry.is_expired(now));
        Ok(entries.keys().cloned().collect())
    }
}
