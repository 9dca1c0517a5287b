//! Repository backends and the cache-aside store built on them

pub mod cached;
pub mod document;
pub mod memory;
pub mod pg;

#[cfg(test)]
mod tests;

pub use cached::CachedStore;
pub use memory::{InMemoryRepositories, InMemoryRepository};
pub use pg::{PgRepositories, PgRepository, table_ddl};
