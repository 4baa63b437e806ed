//! Error handling for shardcache
//!
//! This module provides the error type and result alias shared by all
//! cache operations.

use thiserror::Error;

/// Errors that can occur in cache operations
#[derive(Error, Debug)]
pub enum Error {
    /// Errors related to a backend shard (connection, transport, protocol)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Errors encoding a value for storage
    #[error("Encode error: {0}")]
    Encode(String),

    /// Errors decoding a stored byte value
    #[error("Decode error: {0}")]
    Decode(String),

    /// Errors related to configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Create a new encode error
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode(message.into())
    }

    /// Create a new decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a backend error
    pub fn is_backend_error(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    /// Check if this is an encode error
    pub fn is_encode_error(&self) -> bool {
        matches!(self, Self::Encode(_))
    }

    /// Check if this is a decode error
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
