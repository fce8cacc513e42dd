//! Structured error types for API responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (4xx-like)
    ValidationError,

    // Not found errors
    TaskNotFound,

    // Auth errors
    Unauthorized,

    // Internal errors
    UpstreamError,
    DatabaseError,
}

/// Application error, mapped to an HTTP status and the
/// `{success: false, error, code}` envelope at the response boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{field} {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("Upstream workflow error: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl ApiError {
    /// Convenience constructor for input validation failures.
    pub fn validation(field: &'static str, reason: &'static str) -> Self {
        Self::Validation { field, reason }
    }

    pub fn task_not_found(task_id: &str) -> Self {
        Self::TaskNotFound(task_id.to_string())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::ValidationError,
            Self::TaskNotFound(_) => ErrorCode::TaskNotFound,
            Self::Unauthorized(_) => ErrorCode::Unauthorized,
            Self::Upstream(_) => ErrorCode::UpstreamError,
            Self::Database(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::TaskNotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Upstream(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error envelope returned to API clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    code: ErrorCode,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            success: false,
            error: self.to_string(),
            code: self.code(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
