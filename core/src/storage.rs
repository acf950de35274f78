//! Storage collaborator contracts.
//!
//! The service talks to three collections (events, users, registrations)
//! through these traits. They only promise single-item atomicity: a
//! conditional insert, an atomic counter adjustment, a put or a delete.
//! Nothing here spans more than one record, so callers must not assume
//! multi-step sequences are isolated.
//!
//! ```text
//! ┌──────────────────────┐     ┌───────────────────┐
//! │ RegistrationEngine   │────▶│ EventRepository   │  events by id, counter
//! │ Catalog              │────▶│ UserRepository    │  users by id
//! │ Projections          │────▶│ RegistrationRepo. │  (user, event) + by event / by user
//! └──────────────────────┘     └───────────────────┘
//! ```
//!
//! Methods return `BoxFuture` instead of being `async fn` so the traits stay
//! dyn-compatible and can be shared as `Arc<dyn ...>`.

use crate::error::StorageError;
use crate::types::{Event, EventId, EventUpdate, Registration, RegistrationStatus, User, UserId};
use futures::future::BoxFuture;

/// Result type alias for storage calls.
pub type StorageResult<T> = Result<T, StorageError>;

/// Outcome of a conditional insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was written.
    Inserted,
    /// A record with the same key already existed; nothing was written.
    AlreadyExists,
}

/// Events collection.
pub trait EventRepository: Send + Sync {
    /// Fetch an event by id.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn get_event<'a>(&'a self, event_id: &'a EventId) -> BoxFuture<'a, StorageResult<Option<Event>>>;

    /// List events, optionally only those whose `status` equals the filter.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn list_events<'a>(&'a self, status: Option<&'a str>) -> BoxFuture<'a, StorageResult<Vec<Event>>>;

    /// Unconditionally write an event.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn put_event<'a>(&'a self, event: &'a Event) -> BoxFuture<'a, StorageResult<()>>;

    /// Apply the present fields of `update` to an existing event.
    ///
    /// Returns the updated event, or `None` if no event has that id.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn update_event<'a>(
        &'a self,
        event_id: &'a EventId,
        update: &'a EventUpdate,
    ) -> BoxFuture<'a, StorageResult<Option<Event>>>;

    /// Delete an event. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn delete_event<'a>(&'a self, event_id: &'a EventId) -> BoxFuture<'a, StorageResult<bool>>;

    /// Atomically add `delta` to the event's `registered_count`.
    ///
    /// Returns the new count, or `None` if the event does not exist (in which
    /// case nothing is written).
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails or the count would become negative.
    fn adjust_registered_count<'a>(
        &'a self,
        event_id: &'a EventId,
        delta: i32,
    ) -> BoxFuture<'a, StorageResult<Option<u32>>>;

    /// Cheap connectivity check used by readiness probes.
    ///
    /// # Errors
    ///
    /// Returns error if the backend is unreachable.
    fn ping(&self) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

/// Users collection.
pub trait UserRepository: Send + Sync {
    /// Fetch a user by id.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn get_user<'a>(&'a self, user_id: &'a UserId) -> BoxFuture<'a, StorageResult<Option<User>>>;

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn list_users(&self) -> BoxFuture<'_, StorageResult<Vec<User>>>;

    /// Insert a user unless one with the same id exists.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn insert_user<'a>(&'a self, user: &'a User) -> BoxFuture<'a, StorageResult<InsertOutcome>>;
}

/// Registrations collection, keyed by `(user_id, event_id)`.
pub trait RegistrationRepository: Send + Sync {
    /// Fetch the registration for a (user, event) pair.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn get_registration<'a>(
        &'a self,
        user_id: &'a UserId,
        event_id: &'a EventId,
    ) -> BoxFuture<'a, StorageResult<Option<Registration>>>;

    /// Unconditionally write a registration (insert or replace).
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn put_registration<'a>(&'a self, registration: &'a Registration) -> BoxFuture<'a, StorageResult<()>>;

    /// Delete a registration. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn delete_registration<'a>(
        &'a self,
        user_id: &'a UserId,
        event_id: &'a EventId,
    ) -> BoxFuture<'a, StorageResult<bool>>;

    /// Set the waitlist position of an existing registration.
    ///
    /// Returns `false` if the registration does not exist.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn set_position<'a>(
        &'a self,
        user_id: &'a UserId,
        event_id: &'a EventId,
        position: u32,
    ) -> BoxFuture<'a, StorageResult<bool>>;

    /// Secondary lookup by event, optionally filtered by status. Unordered.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn registrations_for_event<'a>(
        &'a self,
        event_id: &'a EventId,
        status: Option<RegistrationStatus>,
    ) -> BoxFuture<'a, StorageResult<Vec<Registration>>>;

    /// Secondary lookup by user, optionally filtered by status. Unordered.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn registrations_for_user<'a>(
        &'a self,
        user_id: &'a UserId,
        status: Option<RegistrationStatus>,
    ) -> BoxFuture<'a, StorageResult<Vec<Registration>>>;
}
