//! The cache manager
//!
//! Owns one backend session per configured endpoint, a router for canonical
//! shard selection, and the advisory directory of last known key locations.
//! Reads probe a candidate shard and fall back to a bounded walk of the
//! remaining ring; writes and deletes place keys according to the
//! configured [`WritePolicy`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::backend::ShardBackend;
use crate::config::{CacheConfig, Endpoint, WritePolicy};
use crate::directory::ShardDirectory;
use crate::error::{Error, Result};
use crate::metrics::{CacheMetrics, MetricsSnapshot};
use crate::router::ShardRouter;
use crate::value::{self, Value};

/// Sharded cache manager
///
/// The shard list is fixed at construction and never reordered; a shard's
/// position is its index for routing. All operations are safe to call from
/// multiple threads concurrently.
pub struct CacheManager {
    shards: Vec<Arc<dyn ShardBackend>>,
    router: ShardRouter,
    directory: ShardDirectory,
    metrics: CacheMetrics,
    write_policy: WritePolicy,
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("shard_count", &self.shards.len())
            .field("write_policy", &self.write_policy)
            .field("directory_len", &self.directory.len())
            .finish()
    }
}

impl CacheManager {
    /// Create a manager over pre-connected backends
    ///
    /// `shards` must contain one backend per configured endpoint, in
    /// endpoint order. The directory is seeded here by enumerating every
    /// key on every shard; cost is linear in the total key count and paid
    /// once per process. A backend that cannot enumerate its keys fails
    /// construction, since a silently unseeded directory would misreport
    /// genuine misses.
    pub fn new(config: CacheConfig, shards: Vec<Arc<dyn ShardBackend>>) -> Result<Self> {
        config.validate()?;
        if shards.len() != config.endpoints.len() {
            return Err(Error::config(format!(
                "Expected {} backends for {} endpoints, got {}",
                config.endpoints.len(),
                config.endpoints.len(),
                shards.len()
            )));
        }

        let directory = ShardDirectory::new();
        for (index, shard) in shards.iter().enumerate() {
            let keys = shard.keys().map_err(|e| {
                Error::backend(format!("Startup key scan failed on shard {}: {}", index, e))
            })?;
            for key in keys {
                directory.record(&key, index);
            }
        }
        info!(
            shards = shards.len(),
            keys = directory.len(),
            "seeded shard directory"
        );

        Ok(Self {
            router: ShardRouter::new(shards.len()),
            shards,
            directory,
            metrics: CacheMetrics::new(),
            write_policy: config.write_policy,
        })
    }

    /// Create a manager by connecting one backend per endpoint
    pub fn connect<F>(config: CacheConfig, mut connect: F) -> Result<Self>
    where
        F: FnMut(&Endpoint) -> Result<Arc<dyn ShardBackend>>,
    {
        let shards = config
            .endpoints
            .iter()
            .map(|endpoint| connect(endpoint))
            .collect::<Result<Vec<_>>>()?;
        Self::new(config, shards)
    }

    /// Number of shards on the ring
    pub fn shard_count(&self) -> usize {
        self.router.shard_count()
    }

    /// Placement policy in effect for writes and deletes
    pub fn write_policy(&self) -> WritePolicy {
        self.write_policy
    }

    /// The advisory directory of last known key locations
    pub fn directory(&self) -> &ShardDirectory {
        &self.directory
    }

    /// Snapshot of the manager's activity counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Store a value under `key`, optionally expiring after `ttl`
    ///
    /// Under [`WritePolicy::Legacy`] the write always targets the canonical
    /// hash shard, even if the key currently lives elsewhere, which can
    /// leave a stale duplicate on the old shard. [`WritePolicy::Corrected`]
    /// follows the directory to the key's last known location instead.
    pub fn set(&self, key: &str, value: &Value, ttl: Option<Duration>) -> Result<()> {
        let bytes = match value::encode(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.metrics.record_write_failure();
                return Err(e);
            }
        };

        let target = match self.write_policy {
            WritePolicy::Legacy => self.router.route(key),
            WritePolicy::Corrected => self
                .directory
                .lookup(key)
                .unwrap_or_else(|| self.router.route(key)),
        };

        match self.shards[target].set(key, bytes, ttl) {
            Ok(()) => {
                self.directory.record(key, target);
                self.metrics.record_write();
                Ok(())
            }
            Err(e) => {
                warn!(key, shard = target, error = %e, "write failed");
                self.metrics.record_write_failure();
                Err(e)
            }
        }
    }

    /// Fetch the value stored under `key`
    ///
    /// The candidate shard is the directory's last known location, or the
    /// canonical hash shard when the key has never been observed. On a
    /// candidate miss with no directory record the key is a genuine miss
    /// and no other shard is probed. Otherwise the remaining ring is walked
    /// once, at most `N - 1` further probes; a fallback hit re-records the
    /// key's location so the next read resolves in a single probe.
    ///
    /// Returns `Ok(None)` for a key absent everywhere. A backend error is
    /// surfaced only when no shard produced the value; a failed probe does
    /// not abort the walk.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        let candidate = self
            .directory
            .lookup(key)
            .unwrap_or_else(|| self.router.route(key));
        let mut last_err = None;

        if let Some(bytes) = self.probe(candidate, key, &mut last_err) {
            self.metrics.record_hit();
            return value::decode(&bytes).map(Some);
        }

        // A key never observed anywhere is a genuine miss; scanning the
        // ring for it would be wasted round trips.
        if self.directory.lookup(key).is_none() {
            self.metrics.record_miss();
            return match last_err {
                Some(e) => Err(e),
                None => Ok(None),
            };
        }

        let mut shard = candidate;
        for _ in 1..self.shard_count() {
            shard = self.router.next(shard);
            if let Some(bytes) = self.probe(shard, key, &mut last_err) {
                debug!(key, from = candidate, to = shard, "key relocated");
                self.directory.record(key, shard);
                self.metrics.record_fallback_hit();
                return value::decode(&bytes).map(Some);
            }
        }

        self.metrics.record_miss();
        match last_err {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }

    /// Remove the value stored under `key`, returning whether one existed
    ///
    /// Under [`WritePolicy::Legacy`] only the canonical shard is touched, so
    /// a duplicate left on another shard by the legacy write-through policy
    /// survives. [`WritePolicy::Corrected`] also deletes at the directory's
    /// remembered location. The directory entry is dropped either way to
    /// avoid a perpetually wrong first guess.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let canonical = self.router.route(key);
        let remembered = self.directory.lookup(key);

        let mut removed = match self.shards[canonical].delete(key) {
            Ok(removed) => removed,
            Err(e) => {
                warn!(key, shard = canonical, error = %e, "delete failed");
                return Err(e);
            }
        };

        if self.write_policy == WritePolicy::Corrected {
            if let Some(shard) = remembered.filter(|&shard| shard != canonical) {
                removed |= self.shards[shard].delete(key)?;
            }
        }

        self.directory.forget(key);
        self.metrics.record_delete();
        Ok(removed)
    }

    /// Probe a single shard, treating a backend error as a miss for the
    /// purposes of the walk while remembering it for the caller
    fn probe(&self, shard: usize, key: &str, last_err: &mut Option<Error>) -> Option<Vec<u8>> {
        match self.shards[shard].get(key) {
            Ok(found) => found,
            Err(e) => {
                warn!(key, shard, error = %e, "shard probe failed");
                self.metrics.record_probe_failure();
                *last_err = Some(e);
                None
            }
        }
    }
}
