//! Store Object - document storage layer for Curio
//!
//! This crate provides the `Entity` and `Repository` traits, a query builder
//! over JSON documents, PostgreSQL and in-memory repositories, and the
//! cache-aside `CachedStore` that entity code reads and writes through.

pub mod errors;
pub mod generic_store;
pub mod prelude;
pub mod query_builder;
pub mod traits;

pub use errors::StoreError;
pub use generic_store::{
    CachedStore, InMemoryRepositories, InMemoryRepository, PgRepositories, PgRepository, table_ddl,
};
pub use query_builder::{QueryBuilder, QueryFilter, QueryOperator, SortKind, SortOrder};
pub use traits::*;

use sqlx::PgPool;

pub type DbPool = PgPool;
