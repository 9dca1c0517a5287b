//! Query builder utilities
//!
//! Document queries that render to PostgreSQL JSONB SQL and also evaluate
//! in-process against JSON documents.

pub mod builder;
pub mod filter;
mod matcher;
pub mod ordering;
pub mod sql_generation;

#[cfg(test)]
mod tests;

pub use builder::QueryBuilder;
pub use filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
pub use ordering::{OrderBy, SortKind, SortOrder};
pub use sql_generation::{SqlGenerator, SqlParam};
