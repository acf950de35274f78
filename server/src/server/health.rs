//! Health check endpoints for the registration service.
//!
//! Liveness comes from `event_registration_web::handlers::health_check`;
//! readiness needs the app state to reach the storage backend.

use super::state::AppState;
use axum::{Json, extract::State};
use event_registration_web::{WebResult, handlers::health::ReadinessResponse};

/// Readiness check endpoint.
///
/// Returns 200 OK once the storage backend answers a ping, 503 otherwise.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/ready
/// # {"ready":true,"storage":true}
/// ```
///
/// # Errors
///
/// Returns a 503 `AppError` when the storage ping fails.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> WebResult<Json<ReadinessResponse>> {
    event_registration_web::handlers::readiness(state.ping_storage().await)
}
