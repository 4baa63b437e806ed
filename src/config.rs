//! Configuration for shardcache
//!
//! This module provides the backend endpoint descriptors and the cache
//! manager configuration options.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A backend endpoint participating in the shard ring
///
/// The position of an endpoint in the configured list is its shard index.
/// The list is fixed at startup and never reordered, since the index feeds
/// directly into the hash-routing arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Host name or address of the backend
    pub host: String,
    /// Port the backend listens on
    pub port: u16,
    /// Logical database/namespace id within the backend
    pub namespace: u32,
}

impl Endpoint {
    /// Create a new endpoint descriptor
    pub fn new(host: impl Into<String>, port: u16, namespace: u32) -> Self {
        Self {
            host: host.into(),
            port,
            namespace,
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.port, self.namespace)
    }
}

/// Write and delete placement policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum WritePolicy {
    /// Writes always go to the canonical hash shard and deletes only touch
    /// it, even when the key currently lives elsewhere. A relocated key can
    /// leave a stale duplicate behind that a later delete never reaches.
    Legacy,
    /// Writes follow the directory to the key's last known shard and
    /// deletes chase both the canonical and the remembered location.
    Corrected,
}

impl Default for WritePolicy {
    fn default() -> Self {
        Self::Legacy
    }
}

impl std::fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Corrected => write!(f, "corrected"),
        }
    }
}

impl WritePolicy {
    /// Parse a write policy from a string
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "corrected" => Ok(Self::Corrected),
            _ => Err(Error::config(format!("Unknown write policy: {}", s))),
        }
    }

    /// Get the name of the write policy
    pub fn name(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Corrected => "corrected",
        }
    }
}

/// Configuration options for a cache manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct CacheConfig {
    /// Ordered list of backend endpoints; position = shard index
    pub endpoints: Vec<Endpoint>,
    /// Placement policy for writes and deletes
    pub write_policy: WritePolicy,
}

impl CacheConfig {
    /// Create a configuration for the given endpoint list
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self {
            endpoints,
            write_policy: WritePolicy::default(),
        }
    }

    /// Set the write policy to use
    pub fn with_write_policy(mut self, policy: WritePolicy) -> Self {
        self.write_policy = policy;
        self
    }

    /// Number of shards described by this configuration
    pub fn shard_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            return Err(Error::config("At least one backend endpoint is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_display() {
        let endpoint = Endpoint::new("cache-1.internal", 6379, 0);
        assert_eq!(endpoint.to_string(), "cache-1.internal:6379/0");
    }

    #[test]
    fn test_write_policy_parsing() {
        assert_eq!(WritePolicy::from_str("legacy").unwrap(), WritePolicy::Legacy);
        assert_eq!(
            WritePolicy::from_str("CORRECTED").unwrap(),
            WritePolicy::Corrected
        );
        assert!(WritePolicy::from_str("eventual").is_err());

        assert_eq!(WritePolicy::Legacy.name(), "legacy");
        assert_eq!(WritePolicy::Corrected.to_string(), "corrected");
    }

    #[test]
    fn test_config_validation() {
        let config = CacheConfig::new(vec![]);
        assert!(config.validate().is_err());

        let config = CacheConfig::new(vec![Endpoint::new("localhost", 6379, 0)]);
        assert!(config.validate().is_ok());
        assert_eq!(config.shard_count(), 1);
        assert_eq!(config.write_policy, WritePolicy::Legacy);

        let config = config.with_write_policy(WritePolicy::Corrected);
        assert_eq!(config.write_policy, WritePolicy::Corrected);
    }
}
