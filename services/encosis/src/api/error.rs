//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so every endpoint returns the
//! same `{code, message, request_id}` body.
//!
//! # Key invariants and assumptions
//! - Error responses must include a stable `code` and human-readable `message`.
//! - Status codes must align with the error category.
//!
//! # Security considerations
//! - Storage failures log details server-side but return generic messages.
use crate::api::types::ErrorResponse;
use crate::service::ServiceError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Structured API error returned by handlers.
///
/// # Invariants
/// - `status` must match the semantics of `body.code`.
///
/// # Example
/// ```rust
/// use axum::http::StatusCode;
/// use encosis::api::error::ApiError;
/// use encosis::api::types::ErrorResponse;
///
/// let err = ApiError {
///     status: StatusCode::NOT_FOUND,
///     body: ErrorResponse {
///         code: "not_found".to_string(),
///         message: "workshop not found".to_string(),
///         request_id: None,
///     },
/// };
/// assert_eq!(err.status, StatusCode::NOT_FOUND);
/// ```
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn api_error(status: StatusCode, code: &str, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            request_id: None,
        },
    }
}

/// Build a 404 Not Found error.
pub fn api_not_found(message: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "not_found", message)
}

/// Build a 409 Conflict error with a caller-provided code.
pub fn api_conflict(code: &str, message: &str) -> ApiError {
    api_error(StatusCode::CONFLICT, code, message)
}

/// Build a 409 error for a workshop or lecture with no seats left.
pub fn api_capacity_exceeded(message: &str) -> ApiError {
    api_conflict("capacity_exceeded", message)
}

/// Build a 500 Internal Server Error without a concrete cause to log.
pub fn api_internal_message(message: &str) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

/// Build a 400 Bad Request validation error.
pub fn api_validation_error(message: &str) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "validation_error", message)
}

/// Translate a service failure into its HTTP shape.
///
/// `context` is the client-facing message for storage failures, e.g.
/// "failed to list workshops". The underlying error is only logged.
pub fn service_error(context: &str, err: ServiceError) -> ApiError {
    match err {
        ServiceError::Validation(message) => api_validation_error(&message),
        ServiceError::NotFound(_) => api_not_found(&err.to_string()),
        ServiceError::CapacityExceeded(message) => api_capacity_exceeded(&message),
        ServiceError::Conflict(message) => api_conflict("conflict", &message),
        ServiceError::Storage(err) => {
            tracing::error!(error = ?err, "encosis storage error");
            api_internal_message(context)
        }
    }
}
