//! Error types for repository and executor operations.
//!
//! All database failures surface as [`DbError`]. Executor implementations map
//! their driver errors into it; the repository layer adds the validation and
//! absent-row conditions on top without translating executor errors further.

use may_postgres::Error as PostgresError;
use std::fmt;

/// Unified error type for data access operations.
#[derive(Debug)]
pub enum DbError {
    /// A record operation was attempted with a zero identifier
    MissingId,
    /// The query matched no rows where exactly one was required
    NotFound,
    /// Error propagated verbatim from the database driver
    Driver(Box<dyn std::error::Error + Send + Sync>),
    /// Query construction or execution error
    Query(String),
    /// Row parsing/conversion error
    Parse(String),
    /// Other execution errors
    Other(String),
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::MissingId => {
                write!(f, "Missing ID")
            }
            DbError::NotFound => {
                write!(f, "Record not found")
            }
            DbError::Driver(e) => {
                write!(f, "Driver error: {e}")
            }
            DbError::Query(s) => {
                write!(f, "Query error: {s}")
            }
            DbError::Parse(s) => {
                write!(f, "Parse error: {s}")
            }
            DbError::Other(s) => {
                write!(f, "Execution error: {s}")
            }
        }
    }
}

impl std::error::Error for DbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DbError::Driver(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<PostgresError> for DbError {
    fn from(err: PostgresError) -> Self {
        DbError::Driver(Box::new(err))
    }
}
