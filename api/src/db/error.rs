// Error types for database operations

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Error types for database connection and query operations
#[derive(Debug, Error)]
pub enum DbError {
    /// Error occurred during database connection attempt
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    QueryError(String),

    /// A unique constraint rejected the write
    #[error("Duplicate record: {0}")]
    Conflict(String),
}

impl From<DbErr> for DbError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => DbError::Conflict(detail),
            _ => DbError::QueryError(err.to_string()),
        }
    }
}
