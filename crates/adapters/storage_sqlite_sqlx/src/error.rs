//! Storage-specific error type wrapping sqlx errors.

use controlhub_domain::error::{ConflictError, ControlHubError};

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Failed to serialize or deserialize a stored JSON value.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to run migrations.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for ControlHubError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Map a primary-key collision to `conflict`, anything else to a storage error.
pub(crate) fn unique_violation_or_storage(
    err: sqlx::Error,
    conflict: impl FnOnce() -> ConflictError,
) -> ControlHubError {
    match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => conflict().into(),
        other => StorageError::from(other).into(),
    }
}

pub(crate) fn decode_error(err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}
