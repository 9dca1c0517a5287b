//! Convenience re-exports for common store-object usage

// Core traits
pub use crate::traits::{Entity, Repository, RepositoryFactory};

// Error types
pub use crate::errors::StoreError;

// Stores and repositories
pub use crate::generic_store::{
    CachedStore, InMemoryRepositories, InMemoryRepository, PgRepositories, PgRepository,
};

// Query building
pub use crate::query_builder::{QueryBuilder, QueryFilter, SortKind, SortOrder};

// Cache policy types entities are declared with
pub use cache_system::{CacheManager, EntityPolicy, Invalidation, TtlTier};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use sqlx::PgPool;
