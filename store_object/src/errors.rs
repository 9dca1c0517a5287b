use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} conflict: {message}")]
    Conflict {
        entity: &'static str,
        message: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error in {entity}: {source}")]
    Database {
        entity: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap a database error, lifting unique-key violations into `Conflict`
    pub fn database(entity: &'static str, source: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &source {
            if db_err.is_unique_violation() {
                return Self::Conflict {
                    entity,
                    message: db_err.message().to_string(),
                };
            }
        }
        Self::Database { entity, source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
