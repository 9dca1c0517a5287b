//! Cache system for Curio
//!
//! A fail-open cache layer: a `CacheBackend` seam with Redis and in-memory
//! implementations, the `CacheManager` adapter that swallows backend
//! failures, cache-aside helpers, canonical key building and the
//! per-entity `EntityPolicy` describing key shapes, TTL tiers and
//! invalidation sets.

/// Hit/miss tracing, compiled in only with the `debug-logging` feature
#[cfg(feature = "debug-logging")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod aside;
pub mod backend;
pub mod errors;
pub mod keys;
pub mod manager;
pub mod memory_backend;
pub mod pattern;
pub mod policy;
pub mod prelude;
pub mod redis_backend;

// Re-export centralized config
pub use config::CacheConfig;

pub use backend::CacheBackend;
pub use errors::CacheError;
pub use keys::{canonical_json, canonical_value, list_key};
pub use manager::{CacheManager, CacheOutcome};
pub use memory_backend::MemoryBackend;
pub use pattern::pattern_matches;
pub use policy::{EntityPolicy, Invalidation, TtlTier};
pub use redis_backend::RedisBackend;
