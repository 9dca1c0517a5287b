//! Convenience re-exports for common Curio usage
//!
//! # Example
//!
//! ```rust
//! use curio::prelude::*;
//!
//! let filter = TicketFilter::default();
//! assert_eq!(Ticket::POLICY.list_key(&filter), "tickets:{}");
//! ```

// Core Curio components
pub use crate::core::{ComponentHealth, Curio, HealthReport, Stores};
pub use crate::errors::{AuthError, CurioError};
pub use crate::migration;

// Domain model and entity-specific operations
pub use crate::entities::*;
pub use crate::identity::{IdentityError, IdentityProfile, IdentityProvider, VerifiedIdentity};
pub use crate::services::*;

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, DatabaseConfig, LogFormat, LoggingConfig};

// Re-export commonly used store-object types for convenience
pub use store_object::prelude::*;

// Re-export cache system
pub use cache_system::prelude::*;

// Common external dependencies
pub use async_trait;
pub use sqlx;
pub use tokio;
