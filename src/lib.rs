//! Sharded cache management
//!
//! `shardcache` distributes keys across a fixed set of independent cache
//! backends. A deterministic router maps each key to a canonical shard, an
//! advisory directory remembers where each key was last seen, and a bounded
//! fallback scan relocates keys whose placement drifted after topology
//! changes or restarts. Values are typed and serialized into a stable
//! on-wire form: integers as plain decimal text, everything else through a
//! self-describing binary encoding.
//!
//! ```no_run
//! use std::sync::Arc;
//! use shardcache::{CacheConfig, CacheManager, Endpoint, MemoryBackend, ShardBackend, Value};
//!
//! # fn main() -> shardcache::Result<()> {
//! let config = CacheConfig::new(vec![
//!     Endpoint::new("cache-1.internal", 6379, 0),
//!     Endpoint::new("cache-2.internal", 6379, 0),
//! ]);
//! let manager = CacheManager::connect(config, |_endpoint| {
//!     Ok(Arc::new(MemoryBackend::new()) as Arc<dyn ShardBackend>)
//! })?;
//!
//! manager.set("answer", &Value::Int(42), None)?;
//! assert_eq!(manager.get("answer")?, Some(Value::Int(42)));
//! # Ok(())
//! # }
//! ```

mod backend;
mod config;
mod directory;
mod error;
mod manager;
mod metrics;
mod router;
pub mod value;

pub use backend::{MemoryBackend, ShardBackend};
pub use config::{CacheConfig, Endpoint, WritePolicy};
pub use directory::ShardDirectory;
pub use error::{Error, Result};
pub use manager::CacheManager;
pub use metrics::{CacheMetrics, MetricsSnapshot};
pub use router::ShardRouter;
pub use value::Value;
