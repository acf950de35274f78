//! # Event Registration Testing
//!
//! Testing utilities and helpers for the event registration service.
//!
//! This crate provides:
//! - Deterministic clocks
//! - Storage doubles that fail on demand
//! - Fixture builders for events, users and a wired environment
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```
//! use event_registration_core::{RegistrationEngine, RegistrationSettings};
//! use event_registration_testing::helpers::{test_environment, EventBuilder};
//!
//! # tokio_test::block_on(async {
//! let (env, storage) = test_environment();
//! EventBuilder::new("e1").capacity(1).waitlist().insert(&*storage).await;
//! let engine = RegistrationEngine::new(env, RegistrationSettings::default());
//! # let _ = engine;
//! # });
//! ```

use chrono::{DateTime, Utc};
use event_registration_core::environment::Clock;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use chrono::Duration;
    use event_registration_core::error::StorageError;
    use event_registration_core::storage::{
        EventRepository, InsertOutcome, RegistrationRepository, StorageResult, UserRepository,
    };
    use event_registration_core::types::{
        Event, EventId, EventUpdate, Registration, RegistrationStatus, User, UserId,
    };
    use futures::future::BoxFuture;
    use std::sync::{Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use event_registration_testing::mocks::FixedClock;
    /// use event_registration_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that moves forward by a fixed step on every read.
    ///
    /// Gives each registration a distinct, increasing `registered_at`.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Start at `start`, advancing `step` per call to [`Clock::now`].
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Storage whose every call fails with the same backend message.
    ///
    /// Stands in for an unreachable database.
    #[derive(Debug, Clone)]
    pub struct UnavailableStorage {
        message: String,
    }

    impl UnavailableStorage {
        /// Fail with `message`.
        #[must_use]
        pub fn new(message: impl Into<String>) -> Self {
            Self {
                message: message.into(),
            }
        }

        fn fail<T: Send + 'static>(&self) -> BoxFuture<'static, StorageResult<T>> {
            let error = StorageError::backend(self.message.clone());
            Box::pin(async move { Err(error) })
        }
    }

    impl Default for UnavailableStorage {
        fn default() -> Self {
            Self::new("storage unavailable")
        }
    }

    impl EventRepository for UnavailableStorage {
        fn get_event<'a>(&'a self, _: &'a EventId) -> BoxFuture<'a, StorageResult<Option<Event>>> {
            self.fail()
        }

        fn list_events<'a>(&'a self, _: Option<&'a str>) -> BoxFuture<'a, StorageResult<Vec<Event>>> {
            self.fail()
        }

        fn put_event<'a>(&'a self, _: &'a Event) -> BoxFuture<'a, StorageResult<()>> {
            self.fail()
        }

        fn update_event<'a>(
            &'a self,
            _: &'a EventId,
            _: &'a EventUpdate,
        ) -> BoxFuture<'a, StorageResult<Option<Event>>> {
            self.fail()
        }

        fn delete_event<'a>(&'a self, _: &'a EventId) -> BoxFuture<'a, StorageResult<bool>> {
            self.fail()
        }

        fn adjust_registered_count<'a>(
            &'a self,
            _: &'a EventId,
            _: i32,
        ) -> BoxFuture<'a, StorageResult<Option<u32>>> {
            self.fail()
        }

        fn ping(&self) -> BoxFuture<'_, StorageResult<()>> {
            self.fail()
        }
    }

    impl UserRepository for UnavailableStorage {
        fn get_user<'a>(&'a self, _: &'a UserId) -> BoxFuture<'a, StorageResult<Option<User>>> {
            self.fail()
        }

        fn list_users(&self) -> BoxFuture<'_, StorageResult<Vec<User>>> {
            self.fail()
        }

        fn insert_user<'a>(&'a self, _: &'a User) -> BoxFuture<'a, StorageResult<InsertOutcome>> {
            self.fail()
        }
    }

    impl RegistrationRepository for UnavailableStorage {
        fn get_registration<'a>(
            &'a self,
            _: &'a UserId,
            _: &'a EventId,
        ) -> BoxFuture<'a, StorageResult<Option<Registration>>> {
            self.fail()
        }

        fn put_registration<'a>(&'a self, _: &'a Registration) -> BoxFuture<'a, StorageResult<()>> {
            self.fail()
        }

        fn delete_registration<'a>(
            &'a self,
            _: &'a UserId,
            _: &'a EventId,
        ) -> BoxFuture<'a, StorageResult<bool>> {
            self.fail()
        }

        fn set_position<'a>(
            &'a self,
            _: &'a UserId,
            _: &'a EventId,
            _: u32,
        ) -> BoxFuture<'a, StorageResult<bool>> {
            self.fail()
        }

        fn registrations_for_event<'a>(
            &'a self,
            _: &'a EventId,
            _: Option<RegistrationStatus>,
        ) -> BoxFuture<'a, StorageResult<Vec<Registration>>> {
            self.fail()
        }

        fn registrations_for_user<'a>(
            &'a self,
            _: &'a UserId,
            _: Option<RegistrationStatus>,
        ) -> BoxFuture<'a, StorageResult<Vec<Registration>>> {
            self.fail()
        }
    }
}

/// Fixture builders.
pub mod helpers {
    use super::mocks::test_clock;
    use event_registration_core::environment::{Clock, RegistrationEnvironment};
    use event_registration_core::memory::InMemoryStorage;
    use event_registration_core::storage::{EventRepository, UserRepository};
    use event_registration_core::types::{Event, EventId, NewEvent, User, UserId};
    use std::sync::Arc;

    /// In-memory environment on the fixed [`test_clock`], plus a handle to
    /// the storage for seeding and inspection.
    #[must_use]
    pub fn test_environment() -> (RegistrationEnvironment, Arc<InMemoryStorage>) {
        let storage = Arc::new(InMemoryStorage::new());
        let env = RegistrationEnvironment::from_storage(Arc::new(test_clock()), storage.clone());
        (env, storage)
    }

    /// Install a test-writer tracing subscriber. Safe to call repeatedly.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    }

    /// Builder for [`NewEvent`] fixtures.
    #[derive(Debug, Clone)]
    pub struct EventBuilder {
        event: NewEvent,
    }

    impl EventBuilder {
        /// Active event with capacity 10 and no waitlist.
        #[must_use]
        pub fn new(event_id: &str) -> Self {
            Self {
                event: NewEvent {
                    event_id: EventId::new(event_id),
                    title: format!("Event {event_id}"),
                    description: "Test event".to_string(),
                    date: "2025-06-01".to_string(),
                    location: "Test Venue".to_string(),
                    capacity: 10,
                    organizer: "Test Organizer".to_string(),
                    status: "active".to_string(),
                    has_waitlist: false,
                },
            }
        }

        /// Set the capacity.
        #[must_use]
        pub const fn capacity(mut self, capacity: u32) -> Self {
            self.event.capacity = capacity;
            self
        }

        /// Enable the waitlist.
        #[must_use]
        pub const fn waitlist(mut self) -> Self {
            self.event.has_waitlist = true;
            self
        }

        /// Set the date.
        #[must_use]
        pub fn date(mut self, date: &str) -> Self {
            self.event.date = date.to_string();
            self
        }

        /// Set the status.
        #[must_use]
        pub fn status(mut self, status: &str) -> Self {
            self.event.status = status.to_string();
            self
        }

        /// The creation payload.
        #[must_use]
        pub fn build(self) -> NewEvent {
            self.event
        }

        /// Store the event directly, bypassing the catalog.
        ///
        /// # Panics
        ///
        /// Panics if the storage write fails.
        #[allow(clippy::expect_used)]
        pub async fn insert(self, storage: &dyn EventRepository) -> Event {
            let event = self.event.into_event();
            storage.put_event(&event).await.expect("seeding event should succeed");
            event
        }
    }

    /// Store a user directly, bypassing the catalog.
    ///
    /// # Panics
    ///
    /// Panics if the storage write fails.
    #[allow(clippy::expect_used)]
    pub async fn insert_user(storage: &dyn UserRepository, user_id: &str) -> UserId {
        let user = User {
            user_id: UserId::new(user_id),
            name: format!("User {user_id}"),
            created_at: test_clock().now(),
        };
        storage.insert_user(&user).await.expect("seeding user should succeed");
        user.user_id
    }
}

/// Property-based testing strategies.
pub mod properties {
    use proptest::prelude::*;

    /// One step against a single event in a generated scenario.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Op {
        /// Register the user at this index
        Register(usize),
        /// Unregister the user at this index
        Unregister(usize),
    }

    /// Random sequences of register/unregister steps over `users` users.
    pub fn ops(users: usize, max_len: usize) -> impl Strategy<Value = Vec<Op>> {
        let op = prop_oneof![
            3 => (0..users).prop_map(Op::Register),
            2 => (0..users).prop_map(Op::Unregister),
        ];
        proptest::collection::vec(op, 1..max_len)
    }
}

// Re-export commonly used items
pub use helpers::{EventBuilder, init_tracing, insert_user, test_environment};
pub use mocks::{FixedClock, SteppingClock, UnavailableStorage, test_clock};
