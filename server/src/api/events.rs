//! Event management API endpoints.
//!
//! Provides CRUD operations for events:
//! - POST /events - Create (or replace) an event
//! - GET /events/:id - Get event details
//! - GET /events - List events, optionally filtered by status
//! - PUT /events/:id - Partially update an event
//! - DELETE /events/:id - Delete an event

use super::MessageResponse;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use event_registration_core::{Event, EventId, EventUpdate, NewEvent};
use event_registration_web::{ApiJson, WebResult};
use serde::Deserialize;

/// Query parameters for listing events.
#[derive(Debug, Default, Deserialize)]
pub struct ListEventsQuery {
    /// Only events with exactly this status
    pub status: Option<String>,
}

/// Create a new event.
///
/// The registration counter starts at zero. An event with the same id is
/// replaced.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/events \
///   -H "Content-Type: application/json" \
///   -d '{
///     "eventId": "rustconf-2025",
///     "title": "RustConf",
///     "description": "Annual Rust conference",
///     "date": "2025-09-02",
///     "location": "Seattle",
///     "capacity": 500,
///     "organizer": "Rust Foundation",
///     "status": "active",
///     "hasWaitlist": true
///   }'
/// ```
///
/// # Errors
///
/// Returns 500 if storage fails.
pub async fn create_event(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewEvent>,
) -> WebResult<(StatusCode, Json<Event>)> {
    let event = state.catalog.create_event(request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Get event details by ID.
///
/// # Errors
///
/// Returns 404 if the event does not exist.
pub async fn get_event(
    Path(event_id): Path<EventId>,
    State(state): State<AppState>,
) -> WebResult<Json<Event>> {
    Ok(Json(state.catalog.get_event(&event_id).await?))
}

/// List events.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/events?status=active
/// ```
///
/// # Errors
///
/// Returns 500 if storage fails.
pub async fn list_events(
    Query(query): Query<ListEventsQuery>,
    State(state): State<AppState>,
) -> WebResult<Json<Vec<Event>>> {
    let events = state.catalog.list_events(query.status.as_deref()).await?;
    Ok(Json(events))
}

/// Update the fields present in the body.
///
/// # Example
///
/// ```bash
/// curl -X PUT http://localhost:8080/events/rustconf-2025 \
///   -H "Content-Type: application/json" \
///   -d '{"capacity": 600}'
/// ```
///
/// # Errors
///
/// Returns 404 if the event does not exist, 400 if the body has no fields.
pub async fn update_event(
    Path(event_id): Path<EventId>,
    State(state): State<AppState>,
    ApiJson(update): ApiJson<EventUpdate>,
) -> WebResult<Json<Event>> {
    Ok(Json(state.catalog.update_event(&event_id, &update).await?))
}

/// Delete an event. Its registrations are kept.
///
/// # Errors
///
/// Returns 404 if the event does not exist.
pub async fn delete_event(
    Path(event_id): Path<EventId>,
    State(state): State<AppState>,
) -> WebResult<Json<MessageResponse>> {
    state.catalog.delete_event(&event_id).await?;
    Ok(Json(MessageResponse {
        message: "Event deleted successfully".to_string(),
    }))
}
