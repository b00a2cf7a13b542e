//! Shared database types for Memora
//!
//! Common database-related types and helpers used across domain
//! repositories.

use crate::error::Error;
use thiserror::Error;

/// Database-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Record already exists")]
    AlreadyExists,

    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Error::NotFound("Record not found".to_string()),
            RepositoryError::AlreadyExists => Error::Conflict("Record already exists".to_string()),
            RepositoryError::Connection(e) => Error::Database(e),
            RepositoryError::InvalidData(msg) => Error::Validation(msg),
        }
    }
}

/// Check whether a sqlx error is a Postgres unique-constraint violation
/// (SQLSTATE 23505). Used by repositories to surface duplicate keys as
/// `RepositoryError::AlreadyExists` instead of a raw database error.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_repository_error_maps_to_taxonomy() {
        let err: Error = RepositoryError::NotFound.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: Error = RepositoryError::AlreadyExists.into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err: Error = RepositoryError::InvalidData("bad".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_non_database_error_is_not_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
