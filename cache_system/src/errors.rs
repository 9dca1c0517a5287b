//! Error types for cache operations
//!
//! These errors are produced by cache backends. The fail-open
//! `CacheManager` methods log and swallow them; only health checks
//! hand them back to the caller.

use thiserror::Error;

/// Cache system errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cache connection error: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache operation timed out after {0} ms")]
    Timeout(u64),

    #[error("Cache is disabled")]
    Disabled,
}

impl CacheError {
    /// Whether a fresh connection might make the operation succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            CacheError::Redis(err) => {
                err.is_io_error()
                    || err.is_connection_dropped()
                    || err.is_connection_refusal()
                    || err.is_timeout()
            }
            CacheError::Connection(_) => true,
            CacheError::Serialization(_) | CacheError::Timeout(_) | CacheError::Disabled => false,
        }
    }
}
