//! # Curio
//!
//! Data access for a cultural-exhibit and museum-tour backend: JSON document
//! tables on PostgreSQL behind a fail-open, read-through cache.
//!
//! Reads compute a deterministic key from an id or a filter and go through
//! [`CacheManager::with_cache`](cache_system::CacheManager::with_cache).
//! Successful writes clear the record's keys, every list of its entity and
//! any cascade patterns. A cache outage only costs latency.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use curio::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     curio::telemetry::init(&config.logging)?;
//!
//!     let curio = Curio::connect(config).await?;
//!     curio.auto_migrate().await?;
//!
//!     let stores = curio.stores();
//!     let rome = TicketFilter {
//!         city: Some("Rome".to_string()),
//!         ..Default::default()
//!     };
//!     for ticket in stores.tickets.list(&rome).await? {
//!         println!("{} {:?}", ticket.id, ticket.name.get("en"));
//!     }
//!     let recommended = stores.tickets.recommended(Some("Rome")).await?;
//!     println!("{} recommended", recommended.len());
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod entities;
pub mod errors;
pub mod identity;
pub mod migration;
pub mod prelude;
pub mod services;
pub mod telemetry;

// Re-export the main public types for convenience
pub use crate::core::{ComponentHealth, Curio, HealthReport, Stores};
pub use errors::{AuthError, CurioError};

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, DatabaseConfig, LoggingConfig};

// Re-export internal crates
pub use cache_system;
pub use store_object;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
