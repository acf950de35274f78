//! Error types for registration, catalog and storage operations.

use crate::types::EventId;
use std::fmt;
use thiserror::Error;

/// Result type alias for engine, catalog and projection operations.
pub type Result<T> = std::result::Result<T, RegistrationError>;

/// Failure reported by a storage backend.
///
/// The message is kept verbatim so it can be surfaced to clients unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend rejected or failed the request.
    #[error("{0}")]
    Backend(String),

    /// The backend returned data that does not fit the domain model.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl StorageError {
    /// Convenience constructor for backend failures.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// Kind of record a lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// An event
    Event,
    /// A user
    User,
    /// A (user, event) registration
    Registration,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Event => "Event",
            Self::User => "User",
            Self::Registration => "Registration",
        })
    }
}

/// Why a write collided with existing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// A user with the same id already exists
    UserExists,
    /// The user already holds a seat for the event
    AlreadyRegistered,
    /// The user is already on the event's waitlist
    AlreadyWaitlisted,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UserExists => "User already exists",
            Self::AlreadyRegistered => "User is already registered for this event",
            Self::AlreadyWaitlisted => "User is already on the waitlist for this event",
        })
    }
}

/// Error taxonomy of the registration service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A required record does not exist.
    #[error("{entity} not found")]
    NotFound {
        /// Kind of record
        entity: Entity,
        /// Identifier that was looked up
        id: String,
    },

    /// The request collides with existing state.
    #[error("{0}")]
    Conflict(ConflictReason),

    /// The event is full and offers no waitlist.
    #[error("Event {event_id} is at full capacity")]
    CapacityExceeded {
        /// Full event
        event_id: EventId,
    },

    /// The request itself is invalid.
    #[error("{0}")]
    Validation(String),

    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl RegistrationError {
    /// Build a `NotFound` error.
    #[must_use]
    pub fn not_found(entity: Entity, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns `true` if the error was caused by the caller rather than the system.
    ///
    /// # Examples
    ///
    /// ```
    /// # use event_registration_core::error::{ConflictReason, RegistrationError, StorageError};
    /// assert!(RegistrationError::Conflict(ConflictReason::UserExists).is_client_error());
    /// assert!(!RegistrationError::Storage(StorageError::backend("timeout")).is_client_error());
    /// ```
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}
