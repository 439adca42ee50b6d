//! HTTP error types for the `NoteKV` server.
//!
//! Maps domain errors from `notekv-core` into plain-text HTTP responses.
//! Storage failures are logged in full and answered with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use notekv_core::error::{NameError, NoteError};

/// Application-level error returned from HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Client sent invalid input.
    BadRequest(String),
    /// Internal server error. The message is logged, not returned.
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

impl From<NoteError> for AppError {
    fn from(err: NoteError) -> Self {
        match err {
            NoteError::Storage(_) | NoteError::Corrupt { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl From<NameError> for AppError {
    fn from(err: NameError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
