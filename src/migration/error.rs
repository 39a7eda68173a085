//! Migration-specific error types

use crate::error::DbError;

/// Errors raised by the migration runner.
#[derive(Debug)]
pub enum MigrationError {
    /// Database execution error
    Database(DbError),
    /// The runner was invoked with an empty registry
    Empty,
    /// Two registered migrations share an identifier
    Duplicate(String),
    /// An applied migration is not present in the registry
    Unknown(String),
    /// A migration's `up` or `down` failed
    ExecutionFailed { id: String, error: String },
}

impl std::fmt::Display for MigrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationError::Database(e) => write!(f, "Database error: {}", e),
            MigrationError::Empty => write!(f, "No migrations to run!"),
            MigrationError::Duplicate(id) => {
                write!(f, "Migration '{}' is registered more than once", id)
            }
            MigrationError::Unknown(id) => {
                write!(
                    f,
                    "Applied migration '{}' is not in the registry; register it before rolling back",
                    id
                )
            }
            MigrationError::ExecutionFailed { id, error } => {
                write!(f, "Migration '{}' failed during execution: {}", id, error)
            }
        }
    }
}

impl std::error::Error for MigrationError {}

impl From<DbError> for MigrationError {
    fn from(error: DbError) -> Self {
        MigrationError::Database(error)
    }
}
