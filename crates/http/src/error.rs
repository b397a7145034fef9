//! HTTP error types and implementations

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rowguard_core::access::PermissionDenied;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP-specific errors
#[derive(Error, Debug)]
pub enum HttpError {
    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// A guarded operation was refused
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    pub message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, error_type, code) = match &self {
            Self::AuthenticationFailed(_) => {
                (StatusCode::UNAUTHORIZED, "authentication_failed", None)
            }
            Self::PermissionDenied(denied) => {
                (StatusCode::FORBIDDEN, "permission_denied", Some(denied.code))
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            code,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias using HttpError
pub type Result<T> = std::result::Result<T, HttpError>;
