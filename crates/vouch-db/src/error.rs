//! Database-specific error types and conversions.

use vouch_core::error::VouchError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Row decode failed: {0}")]
    Decode(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<DbError> for VouchError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => VouchError::NotFound { entity, id },
            DbError::Conflict(message) => VouchError::Conflict { message },
            DbError::Crypto(message) => VouchError::Internal(message),
            other => VouchError::Database(other.to_string()),
        }
    }
}
