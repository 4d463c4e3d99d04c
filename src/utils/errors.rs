//! Error handling for ReserveHub
//!
//! This module defines the main error type used throughout the application
//! and how each variant is rendered as an HTTP response.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};

/// Main error type for ReserveHub application
#[derive(Error, Debug)]
pub enum ReserveHubError {
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ReserveHub operations
pub type Result<T> = std::result::Result<T, ReserveHubError>;

/// Postgres SQLSTATE for a value longer than its column allows
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

impl From<sqlx::Error> for ReserveHubError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(STRING_DATA_RIGHT_TRUNCATION) => {
                ReserveHubError::InvalidInput("A value is longer than allowed".to_string())
            }
            _ => ReserveHubError::Database(err),
        }
    }
}

impl From<config::ConfigError> for ReserveHubError {
    fn from(err: config::ConfigError) -> Self {
        ReserveHubError::Config(err.to_string())
    }
}

impl From<JsonRejection> for ReserveHubError {
    fn from(rejection: JsonRejection) -> Self {
        ReserveHubError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for ReserveHubError {
    fn from(rejection: QueryRejection) -> Self {
        ReserveHubError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for ReserveHubError {
    fn from(rejection: PathRejection) -> Self {
        ReserveHubError::InvalidInput(rejection.body_text())
    }
}

impl ReserveHubError {
    /// Shorthand for a missing row
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ReserveHubError::NotFound { entity, id: id.to_string() }
    }

    /// Map a database error, turning unique-constraint violations into conflicts
    pub fn from_db_unique(err: sqlx::Error, what: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ReserveHubError::Conflict(format!("{} already exists", what))
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                ReserveHubError::InvalidInput(format!("{} references a missing record", what))
            }
            _ => ReserveHubError::from(err),
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReserveHubError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ReserveHubError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ReserveHubError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ReserveHubError::NotFound { .. } => StatusCode::NOT_FOUND,
            ReserveHubError::Conflict(_) => StatusCode::CONFLICT,
            ReserveHubError::Database(_)
            | ReserveHubError::Migration(_)
            | ReserveHubError::Config(_)
            | ReserveHubError::Serialization(_)
            | ReserveHubError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ReserveHubError::Database(_) => ErrorSeverity::Critical,
            ReserveHubError::Migration(_) => ErrorSeverity::Critical,
            ReserveHubError::Config(_) => ErrorSeverity::Critical,
            ReserveHubError::PermissionDenied(_) => ErrorSeverity::Warning,
            ReserveHubError::Authentication(_) => ErrorSeverity::Warning,
            ReserveHubError::Conflict(_) => ErrorSeverity::Info,
            ReserveHubError::NotFound { .. } => ErrorSeverity::Info,
            ReserveHubError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// Message sent to the client; internal details stay in the logs
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for ReserveHubError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self.severity() {
            ErrorSeverity::Critical | ErrorSeverity::Error => {
                error!(error = %self, status = status.as_u16(), "Request failed");
            }
            ErrorSeverity::Warning => warn!(error = %self, status = status.as_u16(), "Request rejected"),
            ErrorSeverity::Info => info!(error = %self, status = status.as_u16(), "Request rejected"),
        }

        (status, Json(json!({ "message": self.public_message() }))).into_response()
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
