//! Injected dependencies.
//!
//! All I/O goes through the traits bundled in [`RegistrationEnvironment`]:
//! production wires the PostgreSQL or in-memory backends, tests wire
//! deterministic doubles.

use crate::storage::{EventRepository, RegistrationRepository, UserRepository};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Clock trait - abstracts time operations for testability
///
/// # Examples
///
/// ```
/// use event_registration_core::environment::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let before = chrono::Utc::now();
/// assert!(clock.now() >= before);
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Dependencies shared by the engine, catalog and projections.
#[derive(Clone)]
pub struct RegistrationEnvironment {
    /// Timestamps for `createdAt` / `registeredAt`
    pub clock: Arc<dyn Clock>,
    /// Events collection
    pub events: Arc<dyn EventRepository>,
    /// Users collection
    pub users: Arc<dyn UserRepository>,
    /// Registrations collection
    pub registrations: Arc<dyn RegistrationRepository>,
}

impl RegistrationEnvironment {
    /// Creates a new `RegistrationEnvironment` from individual collections.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventRepository>,
        users: Arc<dyn UserRepository>,
        registrations: Arc<dyn RegistrationRepository>,
    ) -> Self {
        Self {
            clock,
            events,
            users,
            registrations,
        }
    }

    /// Creates an environment where a single backend serves all three collections.
    #[must_use]
    pub fn from_storage<S>(clock: Arc<dyn Clock>, storage: Arc<S>) -> Self
    where
        S: EventRepository + UserRepository + RegistrationRepository + 'static,
    {
        Self {
            clock,
            events: storage.clone(),
            users: storage.clone(),
            registrations: storage,
        }
    }
}

/// How concurrent requests for the same event are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyMode {
    /// Every request runs its storage sequence independently. Concurrent
    /// registrations may overshoot capacity or share a waitlist position.
    #[default]
    Optimistic,
    /// Requests touching the same event run one at a time.
    SerializedPerEvent,
}

/// Engine behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistrationSettings {
    /// Concurrency handling per event
    pub concurrency: ConcurrencyMode,
    /// Close the gap left when a waitlisted user withdraws. Off by default:
    /// only promotion renumbers the waitlist.
    pub compact_waitlist_on_withdrawal: bool,
}
