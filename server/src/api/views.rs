//! Registration views joining registrations with their events or users.
//!
//! - GET /users/:id/registrations - Events the user holds a seat for
//! - GET /users/:id/waitlist - Events the user is queued for
//! - GET /events/:id/registrations - Users holding a seat
//! - GET /events/:id/waitlist - Users queued, by position

use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use event_registration_core::{EventId, RegisteredEventView, RegisteredUserView, UserId};
use event_registration_web::WebResult;

/// Events the user is registered for, by event date.
///
/// # Errors
///
/// Returns 404 if the user does not exist.
pub async fn user_registrations(
    Path(user_id): Path<UserId>,
    State(state): State<AppState>,
) -> WebResult<Json<Vec<RegisteredEventView>>> {
    Ok(Json(state.projections.user_registrations(&user_id).await?))
}

/// Events the user is waitlisted for, with their position in each.
///
/// # Errors
///
/// Returns 404 if the user does not exist.
pub async fn user_waitlist(
    Path(user_id): Path<UserId>,
    State(state): State<AppState>,
) -> WebResult<Json<Vec<RegisteredEventView>>> {
    Ok(Json(state.projections.user_waitlist(&user_id).await?))
}

/// Users registered for the event.
///
/// # Errors
///
/// Returns 404 if the event does not exist.
pub async fn event_registrations(
    Path(event_id): Path<EventId>,
    State(state): State<AppState>,
) -> WebResult<Json<Vec<RegisteredUserView>>> {
    Ok(Json(state.projections.event_registrations(&event_id).await?))
}

/// The event's waitlist, head first.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/events/rustconf-2025/waitlist
/// # [{"userId":"b","name":"B",...,"registrationStatus":"waitlisted","waitlistPosition":1}, ...]
/// ```
///
/// # Errors
///
/// Returns 404 if the event does not exist.
pub async fn event_waitlist(
    Path(event_id): Path<EventId>,
    State(state): State<AppState>,
) -> WebResult<Json<Vec<RegisteredUserView>>> {
    Ok(Json(state.projections.event_waitlist(&event_id).await?))
}
