//! Error types for web handlers.
//!
//! This module bridges domain errors and HTTP responses. Every failure is
//! rendered as a `{code, message}` JSON body:
//!
//! | Domain error | Status | Code |
//! |--------------|--------|------|
//! | `NotFound` | 404 | `NOT_FOUND` |
//! | `Conflict` | 409 | `CONFLICT` |
//! | `CapacityExceeded` | 422 | `CAPACITY_EXCEEDED` |
//! | `Validation` | 400 | `BAD_REQUEST` |
//! | `Storage` | 500 | `INTERNAL_SERVER_ERROR` |

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use event_registration_core::RegistrationError;
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Implements Axum's `IntoResponse`, so handlers can return
/// [`WebResult`](crate::WebResult) and use `?` on domain results.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(state): State<AppState>) -> WebResult<Json<Event>> {
///     let event = state.catalog.get_event(&id).await?;
///     Ok(Json(event))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            message.into(),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 409 Conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            message.into(),
            "CONFLICT".to_string(),
        )
    }

    /// Create a 422 error for a full event without a waitlist.
    #[must_use]
    pub fn capacity_exceeded(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            message.into(),
            "CAPACITY_EXCEEDED".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// Create a 503 Service Unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            message.into(),
            "SERVICE_UNAVAILABLE".to_string(),
        )
    }

    /// HTTP status this error renders with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log internal errors
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Map domain errors onto their HTTP status and code.
///
/// Storage failures keep the backend message verbatim. Caller mistakes are
/// logged here at debug level; server failures are logged when rendered.
impl From<RegistrationError> for AppError {
    fn from(err: RegistrationError) -> Self {
        let message = err.to_string();
        if err.is_client_error() {
            tracing::debug!(error = %message, "Request rejected");
        }
        match err {
            RegistrationError::NotFound { .. } => Self::not_found(message),
            RegistrationError::Conflict(_) => Self::conflict(message),
            RegistrationError::CapacityExceeded { .. } => Self::capacity_exceeded(message),
            RegistrationError::Validation(_) => Self::bad_request(message),
            RegistrationError::Storage(storage) => {
                Self::internal(message).with_source(anyhow::Error::new(storage))
            }
        }
    }
}

/// Keep axum's status and text for malformed JSON bodies.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        Self::new(status, rejection.body_text(), status_code_name(status))
    }
}

/// `"Unprocessable Entity"` becomes `"UNPROCESSABLE_ENTITY"`.
fn status_code_name(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("ERROR")
        .to_ascii_uppercase()
        .replace(' ', "_")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use event_registration_core::{ConflictReason, Entity, EventId, StorageError};

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_domain_error_mapping() {
        let cases = [
            (
                RegistrationError::not_found(Entity::Event, "e1"),
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Event not found",
            ),
            (
                RegistrationError::Conflict(ConflictReason::AlreadyWaitlisted),
                StatusCode::CONFLICT,
                "CONFLICT",
                "User is already on the waitlist for this event",
            ),
            (
                RegistrationError::CapacityExceeded {
                    event_id: EventId::new("e1"),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
                "CAPACITY_EXCEEDED",
                "Event e1 is at full capacity",
            ),
            (
                RegistrationError::Validation("No fields to update".to_string()),
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "No fields to update",
            ),
        ];

        for (domain, status, code, message) in cases {
            let err = AppError::from(domain);
            assert_eq!(err.status(), status);
            assert_eq!(err.code(), code);
            assert_eq!(err.message(), message);
        }
    }

    #[test]
    fn test_storage_failure_is_passed_through() {
        let err = AppError::from(RegistrationError::Storage(StorageError::backend(
            "connection reset by peer",
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "connection reset by peer");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_client_errors_render_as_4xx() {
        let errors = [
            RegistrationError::not_found(Entity::Registration, "a/e1"),
            RegistrationError::Conflict(ConflictReason::AlreadyRegistered),
            RegistrationError::CapacityExceeded {
                event_id: EventId::new("e1"),
            },
            RegistrationError::Validation("No fields to update".to_string()),
            RegistrationError::Storage(StorageError::backend("timeout")),
        ];

        for domain in errors {
            let client = domain.is_client_error();
            let err = AppError::from(domain);
            assert_eq!(err.status().is_client_error(), client, "{err}");
            assert_eq!(err.status().is_server_error(), !client, "{err}");
        }
    }

    #[test]
    fn test_question_mark_converts_into_web_result() {
        fn lookup(result: Result<u32, RegistrationError>) -> crate::WebResult<u32> {
            Ok(result?)
        }

        assert_eq!(lookup(Ok(3)).unwrap(), 3);
        let err = lookup(Err(RegistrationError::not_found(Entity::User, "ghost"))).unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "User not found");
    }

    #[test]
    fn test_status_code_name() {
        assert_eq!(status_code_name(StatusCode::UNSUPPORTED_MEDIA_TYPE), "UNSUPPORTED_MEDIA_TYPE");
        assert_eq!(status_code_name(StatusCode::BAD_REQUEST), "BAD_REQUEST");
    }
}
