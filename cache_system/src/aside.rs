//! Cache-aside orchestration
//!
//! `with_cache` returns the cached value for a key or runs the producer,
//! stores its result and returns it. Producer errors come back untouched;
//! cache errors never do. Concurrent misses on the same key each run the
//! producer and the last write wins.

use crate::manager::CacheManager;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

impl CacheManager {
    /// Cached value at `key`, or the producer's result stored for `ttl`
    ///
    /// ```
    /// use cache_system::CacheManager;
    /// use std::time::Duration;
    ///
    /// # async fn demo() -> Result<(), std::io::Error> {
    /// let (cache, _) = CacheManager::in_memory();
    /// let count: u32 = cache
    ///     .with_cache("levels:count", Duration::from_secs(60), || async { Ok::<_, std::io::Error>(4) })
    ///     .await?;
    /// assert_eq!(count, 4);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_cache<T, E, F, Fut>(&self, key: &str, ttl: Duration, producer: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get::<T>(key).await {
            return Ok(cached);
        }

        let value = producer().await?;
        self.set(key, &value, ttl).await;
        Ok(value)
    }

    /// Like [`with_cache`](Self::with_cache) for lookups that may find nothing
    ///
    /// `None` is handed back but not stored, so a record created right after
    /// a failed lookup is visible on the next read.
    pub async fn with_cache_optional<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<Option<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        if let Some(cached) = self.get::<T>(key).await {
            return Ok(Some(cached));
        }

        let value = producer().await?;
        if let Some(found) = &value {
            self.set(key, found, ttl).await;
        }
        Ok(value)
    }
}
