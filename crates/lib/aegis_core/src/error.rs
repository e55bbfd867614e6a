//! Errors shared by the pairing, device and telemetry modules.

use thiserror::Error;

/// Domain errors for token, device, activity and stats operations.
///
/// Ownership failures are reported as `NotFound` so callers cannot tell a
/// foreign entity from a missing one.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    pub(crate) fn token_not_found() -> Self {
        CoreError::NotFound("Token not found".into())
    }

    pub(crate) fn device_not_found() -> Self {
        CoreError::NotFound("Device not found".into())
    }

    /// Map a write error, turning a foreign-key violation (the parent row was
    /// deleted concurrently) into `not_found`.
    pub(crate) fn from_write(e: sqlx::Error, not_found: fn() -> CoreError) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_foreign_key_violation() {
                return not_found();
            }
            if db.is_check_violation() {
                return CoreError::Validation(format!("Value out of range: {}", db.message()));
            }
        }
        CoreError::DbError(e)
    }
}
