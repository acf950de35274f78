//! User API endpoints.
//!
//! - POST /users - Create a user (409 if the id is taken)
//! - GET /users/:id - Get a user
//! - GET /users - List users

use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use event_registration_core::{NewUser, User, UserId};
use event_registration_web::{ApiJson, WebResult};

/// Create a user. `createdAt` is set by the server.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/users \
///   -H "Content-Type: application/json" \
///   -d '{"userId": "ferris", "name": "Ferris"}'
/// ```
///
/// # Errors
///
/// Returns 409 if a user with the same id exists.
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewUser>,
) -> WebResult<(StatusCode, Json<User>)> {
    let user = state.catalog.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by ID.
///
/// # Errors
///
/// Returns 404 if the user does not exist.
pub async fn get_user(
    Path(user_id): Path<UserId>,
    State(state): State<AppState>,
) -> WebResult<Json<User>> {
    Ok(Json(state.catalog.get_user(&user_id).await?))
}

/// List all users.
///
/// # Errors
///
/// Returns 500 if storage fails.
pub async fn list_users(State(state): State<AppState>) -> WebResult<Json<Vec<User>>> {
    Ok(Json(state.catalog.list_users().await?))
}
