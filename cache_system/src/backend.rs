//! Storage seam for the cache
//!
//! A backend stores raw JSON strings with an expiry and knows how to
//! remove keys by glob pattern. It reports every failure; deciding what
//! to do with them is the manager's job.

use crate::errors::CacheError;
use async_trait::async_trait;
use std::time::Duration;

/// Key-value store with expiration support
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Fetch the payload stored at `key`, `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` at `key`, replacing any previous entry, for `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Remove a single key, returns whether it existed
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Remove every key matching a `*` glob, returns how many were removed
    async fn delete_matching(&self, pattern: &str) -> Result<u64, CacheError>;

    /// Round trip to the store
    async fn ping(&self) -> Result<(), CacheError>;

    /// Short name used in logs and health reports
    fn name(&self) -> &'static str;
}

/// Expiry in whole seconds, never zero
///
/// Stores with second granularity would reject or immediately drop a zero TTL.
pub fn ttl_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs();
    if ttl.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_seconds_rounds_up() {
        assert_eq!(ttl_seconds(Duration::from_secs(120)), 120);
        assert_eq!(ttl_seconds(Duration::from_millis(1500)), 2);
        assert_eq!(ttl_seconds(Duration::from_millis(1)), 1);
        assert_eq!(ttl_seconds(Duration::ZERO), 1);
    }
}
