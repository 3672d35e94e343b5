//! Application error type mapping to HTTP status codes.
//!
//! Bodies follow the webhook's own shape: `{"status":"error","error":...}`,
//! except `Forbidden`, which is what Meta expects from a failed
//! verification handshake.

use std::any::Any;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use menubot_infra::signature::SignatureError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Webhook verification token or mode mismatch.
    Forbidden,
    /// Payload signature missing or wrong.
    Unauthorized(String),
    /// Unparseable request.
    BadRequest(String),
    /// A handler panicked; details are logged, not returned.
    Internal,
}

impl From<SignatureError> for AppError {
    fn from(e: SignatureError) -> Self {
        AppError::Unauthorized(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Forbidden => {
                return (StatusCode::FORBIDDEN, Json(json!({"error": "Forbidden"}))).into_response();
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({"status": "error", "error": message}))).into_response()
    }
}

/// Response for a request whose handler panicked.
///
/// Installed through `CatchPanicLayer::custom`; logs the panic payload and
/// answers 500 instead of dropping the connection.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = %detail, "recovered from panic while handling request");
    AppError::Internal.into_response()
}
