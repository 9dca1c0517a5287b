//! Cache manager implementation
//!
//! `CacheManager` is the fail-open face of the cache. Every method degrades
//! to "nothing is cached" when the backend misbehaves: reads become misses,
//! writes and deletes become no-ops, and the failure is logged. A slow
//! backend is cut off after `operation_timeout`.

use crate::backend::CacheBackend;
use crate::errors::CacheError;
use crate::memory_backend::MemoryBackend;
use crate::policy::Invalidation;
use crate::redis_backend::RedisBackend;
use config::CacheConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Result of a write-side cache operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// The backend accepted the operation
    Applied,
    /// Caching is disabled or the backend failed; nothing changed
    Ignored,
}

impl CacheOutcome {
    pub fn is_applied(self) -> bool {
        self == CacheOutcome::Applied
    }
}

/// Shared, fail-open cache handle
///
/// Cloning is cheap; every clone talks to the same backend.
#[derive(Clone)]
pub struct CacheManager {
    backend: Option<Arc<dyn CacheBackend>>,
    operation_timeout: Duration,
    default_ttl: Duration,
}

impl Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("backend", &self.backend_name())
            .field("operation_timeout", &self.operation_timeout)
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl CacheManager {
    /// Build a manager from configuration
    ///
    /// A disabled cache, or a Redis URL that cannot even be parsed, yields a
    /// manager that never caches. Startup never fails because of the cache.
    pub fn new(config: &CacheConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }

        match RedisBackend::new(config) {
            Ok(backend) => Self::with_backend(Arc::new(backend), config),
            Err(err) => {
                tracing::warn!(error = %err, "invalid Redis configuration, caching disabled");
                Self::disabled()
            }
        }
    }

    /// Manager over an explicit backend
    pub fn with_backend(backend: Arc<dyn CacheBackend>, config: &CacheConfig) -> Self {
        Self {
            backend: Some(backend),
            operation_timeout: config.operation_timeout(),
            default_ttl: config.default_ttl(),
        }
    }

    /// Manager over a fresh process-local backend with default timeouts
    pub fn in_memory() -> (Self, MemoryBackend) {
        let backend = MemoryBackend::new();
        let manager = Self::with_backend(Arc::new(backend.clone()), &CacheConfig::default());
        (manager, backend)
    }

    /// Manager that behaves like an uncached system
    pub fn disabled() -> Self {
        let defaults = CacheConfig::default();
        Self {
            backend: None,
            operation_timeout: defaults.operation_timeout(),
            default_ttl: defaults.default_ttl(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.as_ref().map_or("disabled", |b| b.name())
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Run a backend call under the operation timeout
    async fn run<T, Fut>(&self, fut: Fut) -> Result<T, CacheError>
    where
        Fut: Future<Output = Result<T, CacheError>>,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.operation_timeout.as_millis() as u64)),
        }
    }

    /// Cached value at `key`, `None` on miss or any failure
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let backend = self.backend.as_ref()?;

        let raw = match self.run(backend.get(key)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                trace_log!(key, "cache miss");
                return None;
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                trace_log!(key, "cache hit");
                Some(value)
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "undecodable cache entry, evicting");
                if let Err(err) = self.run(backend.delete(key)).await {
                    tracing::warn!(key, error = %err, "failed to evict undecodable cache entry");
                }
                None
            }
        }
    }

    /// Store `value` at `key` for `ttl`
    pub async fn set<T>(&self, key: &str, value: &T, ttl: Duration) -> CacheOutcome
    where
        T: Serialize + ?Sized,
    {
        let Some(backend) = self.backend.as_ref() else {
            return CacheOutcome::Ignored;
        };

        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to serialize cache value");
                return CacheOutcome::Ignored;
            }
        };

        match self.run(backend.set(key, &payload, ttl)).await {
            Ok(()) => {
                trace_log!(key, ttl_secs = ttl.as_secs(), "cache populated");
                CacheOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "cache write failed");
                CacheOutcome::Ignored
            }
        }
    }

    /// Remove a single key
    pub async fn delete(&self, key: &str) -> CacheOutcome {
        let Some(backend) = self.backend.as_ref() else {
            return CacheOutcome::Ignored;
        };

        match self.run(backend.delete(key)).await {
            Ok(_) => CacheOutcome::Applied,
            Err(err) => {
                tracing::warn!(key, error = %err, "cache delete failed");
                CacheOutcome::Ignored
            }
        }
    }

    /// Remove every key matching a `*` glob
    ///
    /// A pattern without `*` removes exactly that key. An empty pattern is
    /// ignored rather than treated as "everything".
    pub async fn delete_matching(&self, pattern: &str) -> CacheOutcome {
        if pattern.is_empty() {
            tracing::warn!("refusing to invalidate an empty cache pattern");
            return CacheOutcome::Ignored;
        }
        let Some(backend) = self.backend.as_ref() else {
            return CacheOutcome::Ignored;
        };

        match self.run(backend.delete_matching(pattern)).await {
            Ok(_removed) => {
                trace_log!(pattern, removed = _removed, "cache pattern invalidated");
                CacheOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(pattern, error = %err, "cache pattern delete failed");
                CacheOutcome::Ignored
            }
        }
    }

    /// Apply an invalidation set; `Applied` only if every step was
    pub async fn invalidate(&self, invalidation: &Invalidation) -> CacheOutcome {
        if !self.is_enabled() {
            return CacheOutcome::Ignored;
        }

        let mut outcome = CacheOutcome::Applied;
        for key in &invalidation.keys {
            if !self.delete(key).await.is_applied() {
                outcome = CacheOutcome::Ignored;
            }
        }
        for pattern in &invalidation.patterns {
            if !self.delete_matching(pattern).await.is_applied() {
                outcome = CacheOutcome::Ignored;
            }
        }
        outcome
    }

    /// Check connectivity; the one method that reports cache errors
    pub async fn ping(&self) -> Result<(), CacheError> {
        let backend = self.backend.as_ref().ok_or(CacheError::Disabled)?;
        self.run(backend.ping()).await
    }
}
