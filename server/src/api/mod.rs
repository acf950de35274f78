//! API endpoints for the registration service.
//!
//! This module contains all HTTP API handlers organized by domain:
//! - Events: CRUD operations for events
//! - Users: creating and reading users
//! - Registrations: registering for and withdrawing from events
//! - Views: who is registered or waitlisted where

pub mod events;
pub mod registrations;
pub mod users;
pub mod views;

pub use events::{create_event, delete_event, get_event, list_events, update_event};
pub use registrations::{register, unregister};
pub use users::{create_user, get_user, list_users};
pub use views::{event_registrations, event_waitlist, user_registrations, user_waitlist};

use serde::Serialize;

/// Plain acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable result
    pub message: String,
}
