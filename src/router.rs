//! Deterministic hash routing across the shard ring
//!
//! Routing is a pure function of the key and the shard count, so every
//! process sharing the same endpoint list computes the same canonical shard
//! for a key. That makes it the stable starting point for fallback probing.

/// Maps keys to shard indices on a fixed ring of `shard_count` shards
#[derive(Debug, Clone, Copy)]
pub struct ShardRouter {
    shard_count: usize,
}

impl ShardRouter {
    /// Create a router for a ring of `shard_count` shards
    ///
    /// # Panics
    ///
    /// Panics if `shard_count` is zero; an empty ring has nowhere to route.
    /// The manager rejects empty endpoint lists through its configuration
    /// before constructing a router.
    pub fn new(shard_count: usize) -> Self {
        assert!(shard_count > 0, "shard ring cannot be empty");
        Self { shard_count }
    }

    /// Number of shards on the ring
    pub fn shard_count(&self) -> usize {
        self.shard_count
    }

    /// Compute the canonical shard index for a key
    ///
    /// The hash is the sum of the key's Unicode code point values modulo the
    /// shard count. No distribution guarantees beyond determinism are needed.
    pub fn route(&self, key: &str) -> usize {
        let sum = key
            .chars()
            .fold(0u64, |acc, c| acc.wrapping_add(c as u64));
        (sum % self.shard_count as u64) as usize
    }

    /// Successor of a shard index on the ring
    pub fn next(&self, shard: usize) -> usize {
        (shard + 1) % self.shard_count
    }
}
