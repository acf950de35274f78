//! Registration API endpoints.
//!
//! - POST /events/:id/register - Take a seat or join the waitlist
//! - DELETE /events/:id/register/:user_id - Withdraw, promoting the waitlist head
//!   when a seat frees up

use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use event_registration_core::{EventId, RegisterOutcome, UserId};
use event_registration_web::{ApiJson, RequestId, WebResult};
use serde::{Deserialize, Serialize};

/// Request to register for an event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// User taking the seat
    pub user_id: UserId,
}

/// Response after registering.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// `userId`, `eventId`, `status` and, when waitlisted, `position`
    #[serde(flatten)]
    pub outcome: RegisterOutcome,
    /// Human-readable result
    pub message: String,
}

/// Response after unregistering.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnregisterResponse {
    /// Human-readable result
    pub message: String,
    /// User moved from the waitlist into the freed seat
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted_user: Option<UserId>,
}

/// Register a user for an event.
///
/// A full event with a waitlist puts the user at the back of the queue.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/events/rustconf-2025/register \
///   -H "Content-Type: application/json" \
///   -d '{"userId": "ferris"}'
/// # {"userId":"ferris","eventId":"rustconf-2025","status":"waitlisted","position":3,
/// #  "message":"Event is full. Added to waitlist at position 3"}
/// ```
///
/// # Errors
///
/// - 404 if the user or event does not exist
/// - 409 if the user is already registered or waitlisted
/// - 422 if the event is full and has no waitlist
pub async fn register(
    request_id: RequestId,
    Path(event_id): Path<EventId>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> WebResult<(StatusCode, Json<RegisterResponse>)> {
    tracing::debug!(
        request_id = %request_id.0,
        user_id = %request.user_id,
        event_id = %event_id,
        "Register request"
    );

    let outcome = state.engine.register(&request.user_id, &event_id).await?;
    let message = outcome.message();
    Ok((StatusCode::CREATED, Json(RegisterResponse { outcome, message })))
}

/// Remove a user's registration or waitlist entry.
///
/// # Example
///
/// ```bash
/// curl -X DELETE http://localhost:8080/events/rustconf-2025/register/ferris
/// # {"message":"Successfully unregistered from event. User crab promoted from waitlist",
/// #  "promotedUser":"crab"}
/// ```
///
/// # Errors
///
/// Returns 404 if the user has no registration for the event.
pub async fn unregister(
    request_id: RequestId,
    Path((event_id, user_id)): Path<(EventId, UserId)>,
    State(state): State<AppState>,
) -> WebResult<Json<UnregisterResponse>> {
    tracing::debug!(
        request_id = %request_id.0,
        user_id = %user_id,
        event_id = %event_id,
        "Unregister request"
    );

    let outcome = state.engine.unregister(&user_id, &event_id).await?;
    Ok(Json(UnregisterResponse {
        message: outcome.message(),
        promoted_user: outcome.promoted_user,
    }))
}
