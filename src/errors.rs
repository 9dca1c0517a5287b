//! Error types for the Curio crate

use cache_system::CacheError;
use config::ConfigError;
use store_object::StoreError;
use thiserror::Error;

use crate::identity::IdentityError;

#[derive(Error, Debug)]
pub enum CurioError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

/// Failures of [`Authenticator::authenticate`](crate::services::auth::Authenticator::authenticate)
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("bearer token is required")]
    MissingToken,

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("role '{0}' is required")]
    Forbidden(String),

    #[error("no user registered for identity '{0}'")]
    UserNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
