//! Axum integration for the event registration service.
//!
//! This crate holds the HTTP glue shared by the service binary, keeping the
//! "Functional Core, Imperative Shell" split: handlers parse requests, call
//! into `event-registration-core` and map the result to a response.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON, CORS
//! │  - Request parsing (ApiJson)            │  ← Request ids, tracing
//! │  - Error mapping (AppError)             │
//! ├─────────────────────────────────────────┤
//! │         Core                            │
//! │  - Admission decisions                  │  ← Pure, no I/O
//! │  - Registration engine, catalog, views  │  ← Storage via traits
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use event_registration_web::{ApiJson, WebResult};
//! use axum::{Router, routing::post, Json};
//!
//! async fn create_user(
//!     State(state): State<AppState>,
//!     ApiJson(request): ApiJson<NewUser>,
//! ) -> WebResult<Json<User>> {
//!     Ok(Json(state.catalog.create_user(request).await?))
//! }
//!
//! let app = Router::new()
//!     .route("/users", post(create_user))
//!     .with_state(app_state);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{ApiJson, RequestId};
pub use middleware::{REQUEST_ID_HEADER, cors_layer, request_id_layer};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
