//! Convenience re-exports for common cache-system usage

// Core cache system components
pub use crate::backend::CacheBackend;
pub use crate::errors::CacheError;
pub use crate::manager::{CacheManager, CacheOutcome};
pub use crate::memory_backend::MemoryBackend;
pub use crate::policy::{EntityPolicy, Invalidation, TtlTier};
pub use crate::redis_backend::RedisBackend;

// Re-export centralized config
pub use config::CacheConfig;
