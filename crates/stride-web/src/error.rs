//! API error types and JSON error response formatting.
//!
//! ApiError provides a consistent JSON error body across the `/api` routes,
//! mapping subsystem errors to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use stride_assistant::AssistantError;
use stride_session::SessionError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "not_found").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid parameters.
    BadRequest(String),
    /// 404 Not Found - resource does not exist.
    NotFound(String),
    /// 500 Internal Server Error - details are logged, not returned.
    Internal(String),
    /// 502 Bad Gateway - the chat API failed.
    BadGateway(String),
    /// 503 Service Unavailable - catalog not loaded or assistant disabled.
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "bad_gateway", msg),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::BagIndexOutOfRange { .. } => ApiError::NotFound(err.to_string()),
            SessionError::LockPoisoned(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::Disabled(_) | AssistantError::ClientBuild(_) => {
                ApiError::ServiceUnavailable(err.to_string())
            }
            AssistantError::EmptyMessage | AssistantError::MessageTooLong(_) => {
                ApiError::BadRequest(err.to_string())
            }
            AssistantError::Request(_)
            | AssistantError::Http { .. }
            | AssistantError::EmptyResponse => ApiError::BadGateway(err.to_string()),
        }
    }
}

impl From<minijinja::Error> for ApiError {
    fn from(err: minijinja::Error) -> Self {
        ApiError::Internal(format!("template render failed: {err}"))
    }
}
