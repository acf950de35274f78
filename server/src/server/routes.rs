//! Router configuration for the registration service.
//!
//! Builds the complete Axum router with all endpoints.

use super::health::readiness_check;
use super::state::AppState;
use crate::api::{events, registrations, users, views};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use event_registration_web::{cors_layer, handlers::health_check, request_id_layer};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Configures all routes including:
/// - Health checks
/// - Event and user management
/// - Registration and unregistration
/// - Registration views
///
/// Every request gets a request id, a trace span and CORS headers for
/// `cors_origins`.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        // Health checks
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Event management
        .route("/events", post(events::create_event))
        .route("/events", get(events::list_events))
        .route("/events/:id", get(events::get_event))
        .route("/events/:id", put(events::update_event))
        .route("/events/:id", delete(events::delete_event))
        // Registration
        .route("/events/:id/register", post(registrations::register))
        .route("/events/:id/register/:user_id", delete(registrations::unregister))
        .route("/events/:id/registrations", get(views::event_registrations))
        .route("/events/:id/waitlist", get(views::event_waitlist))
        // Users
        .route("/users", post(users::create_user))
        .route("/users", get(users::list_users))
        .route("/users/:id", get(users::get_user))
        .route("/users/:id/registrations", get(views::user_registrations))
        .route("/users/:id/waitlist", get(views::user_waitlist))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .layer(request_id_layer())
        .with_state(state)
}
