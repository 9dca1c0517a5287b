//! Redis backend
//!
//! One multiplexed connection is opened lazily and shared by every clone
//! of the backend. Connection-class failures drop the cached connection
//! and retry up to `max_retries` times before reporting the error.

use crate::backend::{CacheBackend, ttl_seconds};
use crate::errors::CacheError;
use crate::pattern::escape_for_redis;
use async_trait::async_trait;
use config::CacheConfig;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Redis-backed cache storage
#[derive(Clone)]
pub struct RedisBackend {
    client: Arc<Client>,
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    connection_timeout: Duration,
    max_retries: u32,
}

impl Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connection_status = match self.connection.try_read() {
            Ok(conn) => {
                if conn.is_some() {
                    "connected"
                } else {
                    "no_connection"
                }
            }
            Err(_) => "lock_error",
        };

        f.debug_struct("RedisBackend")
            .field("connection_timeout", &self.connection_timeout)
            .field("max_retries", &self.max_retries)
            .field("connected", &connection_status)
            .finish()
    }
}

impl RedisBackend {
    /// Create a backend for the configured URL without connecting yet
    pub fn new(config: &CacheConfig) -> Result<Self, CacheError> {
        let client = Client::open(config.redis_url.as_str())?;

        Ok(Self {
            client: Arc::new(client),
            connection: Arc::new(RwLock::new(None)),
            connection_timeout: config.connection_timeout(),
            max_retries: config.max_retries,
        })
    }

    /// Get or create the shared connection
    async fn get_connection(&self) -> Result<MultiplexedConnection, CacheError> {
        if let Some(conn) = self.connection.read().await.as_ref() {
            return Ok(conn.clone());
        }

        let mut slot = self.connection.write().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }

        let connection = tokio::time::timeout(
            self.connection_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| {
            CacheError::Connection(format!(
                "connecting to Redis took longer than {:?}",
                self.connection_timeout
            ))
        })??;

        *slot = Some(connection.clone());
        Ok(connection)
    }

    async fn reset_connection(&self) {
        *self.connection.write().await = None;
    }

    /// Run `op` against the shared connection, reconnecting on connection-class errors
    async fn with_retry<T, F, Fut>(&self, mut op: F) -> Result<T, CacheError>
    where
        F: FnMut(MultiplexedConnection) -> Fut,
        Fut: Future<Output = Result<T, CacheError>>,
    {
        let mut attempt = 0;
        loop {
            let result = match self.get_connection().await {
                Ok(conn) => op(conn).await,
                Err(err) => Err(err),
            };

            match result {
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::debug!(attempt, error = %err, "retrying Redis operation");
                    self.reset_connection().await;
                }
                other => return other,
            }
        }
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.with_retry(|mut conn| async move {
            let value: Option<String> = conn.get(key).await?;
            Ok(value)
        })
        .await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let seconds = ttl_seconds(ttl);
        self.with_retry(|mut conn| async move {
            let _: () = conn.set_ex(key, value, seconds).await?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        self.with_retry(|mut conn| async move {
            let deleted: i64 = conn.del(key).await?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn delete_matching(&self, pattern: &str) -> Result<u64, CacheError> {
        if !pattern.contains('*') {
            return Ok(u64::from(self.delete(pattern).await?));
        }

        let pattern = escape_for_redis(pattern);
        self.with_retry(|mut conn| {
            let pattern = pattern.clone();
            async move {
                let keys: Vec<String> = conn.keys(&pattern).await?;
                if keys.is_empty() {
                    return Ok(0);
                }

                let deleted: u64 = conn.del(keys).await?;
                Ok(deleted)
            }
        })
        .await
    }

    async fn ping(&self) -> Result<(), CacheError> {
        self.with_retry(|mut conn| async move {
            let _pong: String = redis::cmd("PING").query_async(&mut conn).await?;
            Ok(())
        })
        .await
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn get_test_backend() -> Option<RedisBackend> {
        let url = std::env::var("REDIS_URL").ok()?;
        let config = CacheConfig::new(url, 60).with_max_retries(1);
        let backend = RedisBackend::new(&config).ok()?;
        backend.ping().await.ok()?;
        Some(backend)
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let config = CacheConfig::new("not a url".to_string(), 60);
        assert!(RedisBackend::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_server_reports_error() {
        let mut config = CacheConfig::new("redis://127.0.0.1:1".to_string(), 60);
        config.connection_timeout_ms = 200;
        let backend = RedisBackend::new(&config.with_max_retries(1)).unwrap();

        assert!(backend.get("level:1").await.is_err());
        assert!(backend.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_set_get_and_pattern_delete() {
        let Some(backend) = get_test_backend().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let ticket_list = "curio-test:tickets:{\"city\":\"Rome\"}";
        let tour_list = "curio-test:tours:{\"city\":\"Rome\"}";
        backend.set(ticket_list, "[1]", Duration::from_secs(30)).await.unwrap();
        backend.set(tour_list, "[2]", Duration::from_secs(30)).await.unwrap();

        assert_eq!(backend.get(ticket_list).await.unwrap().as_deref(), Some("[1]"));

        let removed = backend.delete_matching("curio-test:tickets:*").await.unwrap();
        assert_eq!(removed, 1);
        assert!(backend.get(ticket_list).await.unwrap().is_none());
        assert_eq!(backend.get(tour_list).await.unwrap().as_deref(), Some("[2]"));

        assert!(backend.delete(tour_list).await.unwrap());
        assert!(!backend.delete(tour_list).await.unwrap());
    }
}
