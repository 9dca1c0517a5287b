//! Process-local backend
//!
//! Entries carry a deadline measured on the tokio clock, so tests running
//! with a paused clock can advance past a TTL deterministically. Expired
//! entries are treated as absent on read and removed lazily.

use crate::backend::CacheBackend;
use crate::errors::CacheError;
use crate::pattern::pattern_matches;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory cache storage shared between clones
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    store: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired entry, returns how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|_, entry| !entry.is_expired(now));
        before - store.len()
    }

    /// Live keys, sorted
    pub async fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let store = self.store.read().await;
        let mut keys: Vec<String> = store
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Remaining lifetime of a live key
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let store = self.store.read().await;
        store
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.expires_at - now)
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        {
            let store = self.store.read().await;
            match store.get(key) {
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: remove unless it was replaced in the meantime
        let mut store = self.store.write().await;
        if store.get(key).is_some_and(|entry| entry.is_expired(now)) {
            store.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut store = self.store.write().await;
        store.insert(key.to_string(), CacheEntry::new(value.to_string(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let now = Instant::now();
        let mut store = self.store.write().await;
        Ok(store
            .remove(key)
            .is_some_and(|entry| !entry.is_expired(now)))
    }

    async fn delete_matching(&self, pattern: &str) -> Result<u64, CacheError> {
        let now = Instant::now();
        let mut store = self.store.write().await;
        let mut removed = 0;
        store.retain(|key, entry| {
            if pattern_matches(pattern, key) {
                if !entry.is_expired(now) {
                    removed += 1;
                }
                false
            } else {
                true
            }
        });
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let backend = MemoryBackend::new();
        backend
            .set("level:1", "{\"id\":\"1\"}", Duration::from_secs(60))
            .await
            .unwrap();

        let value = backend.get("level:1").await.unwrap();
        assert_eq!(value.as_deref(), Some("{\"id\":\"1\"}"));
        assert!(backend.get("level:2").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire() {
        let backend = MemoryBackend::new();
        backend
            .set("message:1", "\"hi\"", Duration::from_secs(120))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(119)).await;
        assert!(backend.get("message:1").await.unwrap().is_some());
        assert_eq!(backend.ttl("message:1").await, Some(Duration::from_secs(1)));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(backend.get("message:1").await.unwrap().is_none());
        assert!(backend.keys().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let backend = MemoryBackend::new();
        backend.set("a", "1", Duration::from_secs(10)).await.unwrap();
        backend.set("b", "2", Duration::from_secs(100)).await.unwrap();

        tokio::time::advance(Duration::from_secs(50)).await;
        assert_eq!(backend.purge_expired().await, 1);
        assert_eq!(backend.keys().await, vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_matching_stays_inside_pattern() {
        let backend = MemoryBackend::new();
        let ttl = Duration::from_secs(60);
        backend.set("tickets:{}", "[]", ttl).await.unwrap();
        backend.set("tickets:{\"city\":\"Rome\"}", "[]", ttl).await.unwrap();
        backend.set("ticket:9", "{}", ttl).await.unwrap();
        backend.set("tours:{}", "[]", ttl).await.unwrap();

        assert_eq!(backend.delete_matching("tickets:*").await.unwrap(), 2);
        assert_eq!(
            backend.keys().await,
            vec!["ticket:9".to_string(), "tours:{}".to_string()]
        );

        // nothing left to match
        assert_eq!(backend.delete_matching("tickets:*").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let backend = MemoryBackend::new();
        backend.set("tour:1", "{}", Duration::from_secs(5)).await.unwrap();

        assert!(backend.delete("tour:1").await.unwrap());
        assert!(!backend.delete("tour:1").await.unwrap());
    }
}
