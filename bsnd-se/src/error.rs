//! Error types for bsnd-se HTTP handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::selection::SelectionError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Playback context failed validation (400)
    #[error(transparent)]
    InvalidContext(#[from] SelectionError),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// bsnd-common error
    #[error("Common error: {0}")]
    Common(#[from] bsnd_common::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::InvalidContext(ref err) => {
                (StatusCode::BAD_REQUEST, "INVALID_CONTEXT", err.to_string())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Common(bsnd_common::Error::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg)
            }
            ApiError::Common(bsnd_common::Error::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            }
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "COMMON_ERROR",
                err.to_string(),
            ),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!("{}: {}", error_code, message);
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
