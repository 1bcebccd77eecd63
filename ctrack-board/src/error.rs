//! Error types for ctrack-board
//!
//! Every failure is mapped to a stable `{"error": "..."}` envelope at the
//! HTTP boundary. SQL text and driver messages are logged, never returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// SQLite primary result codes that mean "another writer holds the lock"
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Main error type for structure operations
#[derive(Error, Debug)]
pub enum StructureError {
    /// Referenced node is absent (or owned by another user)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Target container does not exist or has the wrong kind
    #[error("Invalid parent: {0}")]
    InvalidParent(String),

    /// Request failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transient write contention; the only retried class
    #[error("The structure was changed concurrently, please retry")]
    SerializationConflict,

    /// Unknown or malformed user identity
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Database failure that is not contention
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Any other server-side failure
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using StructureError
pub type Result<T> = std::result::Result<T, StructureError>;

impl StructureError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StructureError::NotFound(_) => StatusCode::NOT_FOUND,
            StructureError::InvalidParent(_) | StructureError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            StructureError::SerializationConflict => StatusCode::CONFLICT,
            StructureError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            StructureError::Database(_) | StructureError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the client
    fn public_message(&self) -> String {
        match self {
            StructureError::Database(_) | StructureError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// True if the driver error is SQLite reporting a busy or locked database
pub fn is_conflict(err: &sqlx::Error) -> bool {
    let sqlx::Error::Database(db_err) = err else {
        return false;
    };

    // Extended codes (e.g. 517 SQLITE_BUSY_SNAPSHOT) carry the primary code in the low byte
    if let Some(code) = db_err.code().and_then(|c| c.parse::<i32>().ok()) {
        let primary = code & 0xff;
        return primary == SQLITE_BUSY || primary == SQLITE_LOCKED;
    }

    let message = db_err.message();
    message.contains("database is locked") || message.contains("database table is locked")
}

impl From<sqlx::Error> for StructureError {
    fn from(err: sqlx::Error) -> Self {
        if is_conflict(&err) {
            StructureError::SerializationConflict
        } else {
            StructureError::Database(err)
        }
    }
}

impl From<ctrack_common::Error> for StructureError {
    fn from(err: ctrack_common::Error) -> Self {
        match err {
            ctrack_common::Error::Database(e) => e.into(),
            ctrack_common::Error::InvalidInput(msg) => StructureError::InvalidInput(msg),
            other => StructureError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for StructureError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.public_message(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(StructureError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(StructureError::InvalidParent("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(StructureError::InvalidInput("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(StructureError::SerializationConflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(StructureError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            StructureError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_details_not_exposed() {
        let err = StructureError::Database(sqlx::Error::Protocol("SELECT secret FROM t".into()));
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_non_database_errors_are_not_conflicts() {
        assert!(!is_conflict(&sqlx::Error::PoolTimedOut));
        assert!(!is_conflict(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn test_common_invalid_input_maps_through() {
        let err: StructureError = ctrack_common::Error::InvalidInput("bad".into()).into();
        assert!(matches!(err, StructureError::InvalidInput(msg) if msg == "bad"));
    }
}
