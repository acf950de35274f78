//! Registration engine.
//!
//! Implements the registration state machine:
//!
//! ```text
//!                   register (seat free)
//!   (none) ───────────────────────────────▶ Registered ──┐
//!     │                                         ▲         │ unregister:
//!     │ register (full, waitlist)               │ promote │ count - 1, promote head,
//!     ▼                                         │         │ count + 1 if promoted
//!   Waitlisted(n) ──────────────────────────────┘         ▼
//!     │                                                  (none)
//!     └── unregister ──▶ (none), no counter change
//! ```
//!
//! **Consistency**: the capacity check reads the event, then the write
//! increments the counter atomically. Between the two another request may
//! take the last seat, so in [`ConcurrencyMode::Optimistic`] the counter can
//! overshoot `capacity` under concurrent load. [`ConcurrencyMode::SerializedPerEvent`]
//! closes that window by running each event's operations one at a time.

use crate::admission::{self, Admission};
use crate::environment::{ConcurrencyMode, RegistrationEnvironment, RegistrationSettings};
use crate::error::{Entity, RegistrationError, Result};
use crate::locks::{EventGuard, EventLocks};
use crate::precondition::{ensure_unregistered, require};
use crate::promotion;
use crate::types::{EventId, Registration, RegistrationStatus, UserId};
use serde::Serialize;

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterOutcome {
    /// Registered user
    pub user_id: UserId,
    /// Target event
    pub event_id: EventId,
    /// Whether the user got a seat or joined the waitlist
    pub status: RegistrationStatus,
    /// Waitlist position, when waitlisted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl RegisterOutcome {
    /// Human-readable summary for API responses.
    #[must_use]
    pub fn message(&self) -> String {
        match (self.status, self.position) {
            (RegistrationStatus::Waitlisted, Some(position)) => {
                format!("Event is full. Added to waitlist at position {position}")
            }
            (RegistrationStatus::Waitlisted, None) => "Event is full. Added to waitlist".to_string(),
            (RegistrationStatus::Registered, _) => "Successfully registered for event".to_string(),
        }
    }
}

/// Result of a successful unregistration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnregisterOutcome {
    /// User whose registration was removed
    pub user_id: UserId,
    /// Event it was for
    pub event_id: EventId,
    /// Status the removed registration had
    pub removed_status: RegistrationStatus,
    /// User promoted into the freed seat, if any
    pub promoted_user: Option<UserId>,
}

impl UnregisterOutcome {
    /// Human-readable summary for API responses.
    #[must_use]
    pub fn message(&self) -> String {
        match (self.removed_status, &self.promoted_user) {
            (RegistrationStatus::Registered, Some(promoted)) => format!(
                "Successfully unregistered from event. User {promoted} promoted from waitlist"
            ),
            (RegistrationStatus::Registered, None) => {
                "Successfully unregistered from event".to_string()
            }
            (RegistrationStatus::Waitlisted, _) => "Successfully removed from waitlist".to_string(),
        }
    }
}

/// Registration and unregistration with capacity enforcement.
pub struct RegistrationEngine {
    env: RegistrationEnvironment,
    settings: RegistrationSettings,
    locks: EventLocks,
}

impl RegistrationEngine {
    /// Creates a new engine.
    #[must_use]
    pub fn new(env: RegistrationEnvironment, settings: RegistrationSettings) -> Self {
        Self {
            env,
            settings,
            locks: EventLocks::new(),
        }
    }

    /// Behaviour switches this engine runs with.
    #[must_use]
    pub const fn settings(&self) -> RegistrationSettings {
        self.settings
    }

    /// Register `user_id` for `event_id`.
    ///
    /// Checks run in order and the first failure wins: user exists, event
    /// exists, no registration for the pair yet, then capacity.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::NotFound`] for a missing user or event
    /// - [`RegistrationError::Conflict`] if the pair is already registered or waitlisted
    /// - [`RegistrationError::CapacityExceeded`] if the event is full without a waitlist
    /// - [`RegistrationError::Storage`] if the backend fails
    pub async fn register(&self, user_id: &UserId, event_id: &EventId) -> Result<RegisterOutcome> {
        let _guard = self.serialize(event_id).await;

        require(self.env.users.get_user(user_id).await?, Entity::User, user_id)?;
        let event = require(self.env.events.get_event(event_id).await?, Entity::Event, event_id)?;
        let existing = self.env.registrations.get_registration(user_id, event_id).await?;
        ensure_unregistered(existing.as_ref())?;

        let waitlist = if admission::needs_waitlist(&event) {
            self.env
                .registrations
                .registrations_for_event(event_id, Some(RegistrationStatus::Waitlisted))
                .await?
        } else {
            Vec::new()
        };

        let now = self.env.clock.now();
        match admission::decide(&event, &waitlist) {
            Admission::Register => {
                let registration = Registration::registered(user_id.clone(), event_id.clone(), now);
                self.env.registrations.put_registration(&registration).await?;
                let count = self.adjust_count(event_id, 1).await?;

                tracing::info!(
                    user_id = %user_id,
                    event_id = %event_id,
                    registered_count = ?count,
                    capacity = event.capacity,
                    "User registered"
                );
                metrics::counter!("registration_requests_total", "outcome" => "registered")
                    .increment(1);

                Ok(RegisterOutcome {
                    user_id: user_id.clone(),
                    event_id: event_id.clone(),
                    status: RegistrationStatus::Registered,
                    position: None,
                })
            }
            Admission::Waitlist { position } => {
                let registration =
                    Registration::waitlisted(user_id.clone(), event_id.clone(), position, now);
                self.env.registrations.put_registration(&registration).await?;

                tracing::info!(
                    user_id = %user_id,
                    event_id = %event_id,
                    position,
                    "User waitlisted"
                );
                metrics::counter!("registration_requests_total", "outcome" => "waitlisted")
                    .increment(1);

                Ok(RegisterOutcome {
                    user_id: user_id.clone(),
                    event_id: event_id.clone(),
                    status: RegistrationStatus::Waitlisted,
                    position: Some(position),
                })
            }
            Admission::Reject => {
                tracing::info!(
                    user_id = %user_id,
                    event_id = %event_id,
                    capacity = event.capacity,
                    "Registration rejected, event full"
                );
                metrics::counter!("registration_requests_total", "outcome" => "rejected")
                    .increment(1);

                Err(RegistrationError::CapacityExceeded {
                    event_id: event_id.clone(),
                })
            }
        }
    }

    /// Remove `user_id`'s registration for `event_id`.
    ///
    /// Removing a registered user frees a seat: the counter is decremented,
    /// the waitlist head (if any) is promoted and the counter incremented
    /// again. Removing a waitlisted user changes no counter and promotes
    /// nobody.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::NotFound`] if the pair has no registration
    /// - [`RegistrationError::Storage`] if the backend fails; earlier writes
    ///   in the sequence are kept
    pub async fn unregister(&self, user_id: &UserId, event_id: &EventId) -> Result<UnregisterOutcome> {
        let _guard = self.serialize(event_id).await;

        let registration = require(
            self.env.registrations.get_registration(user_id, event_id).await?,
            Entity::Registration,
            format_args!("{user_id}/{event_id}"),
        )?;

        // A concurrent unregister may have won the delete; only the winner
        // touches the counter.
        if !self.env.registrations.delete_registration(user_id, event_id).await? {
            return Err(RegistrationError::not_found(
                Entity::Registration,
                format_args!("{user_id}/{event_id}"),
            ));
        }

        let promoted_user = match registration.status {
            RegistrationStatus::Registered => self.release_seat(event_id).await?,
            RegistrationStatus::Waitlisted => {
                if self.settings.compact_waitlist_on_withdrawal {
                    if let Some(position) = registration.position {
                        self.compact_waitlist(event_id, position).await?;
                    }
                }
                None
            }
        };

        tracing::info!(
            user_id = %user_id,
            event_id = %event_id,
            removed_status = %registration.status,
            promoted_user = ?promoted_user.as_ref().map(UserId::as_str),
            "User unregistered"
        );
        metrics::counter!(
            "registration_unregistrations_total",
            "status" => registration.status.as_str()
        )
        .increment(1);

        Ok(UnregisterOutcome {
            user_id: user_id.clone(),
            event_id: event_id.clone(),
            removed_status: registration.status,
            promoted_user,
        })
    }

    /// Give up one seat and hand it to the waitlist head, if there is one.
    ///
    /// A counter that is already zero (the event was re-created over live
    /// registrations) is left alone, and the waitlist head is still promoted.
    async fn release_seat(&self, event_id: &EventId) -> Result<Option<UserId>> {
        let seated = self
            .env
            .events
            .get_event(event_id)
            .await?
            .map(|event| event.registered_count);
        if seated == Some(0) {
            tracing::warn!(
                event_id = %event_id,
                "Registered count already zero, seat released without decrement"
            );
        } else {
            self.adjust_count(event_id, -1).await?;
        }
        let promoted = promotion::promote_next(&self.env, event_id).await?;
        if promoted.is_some() {
            self.adjust_count(event_id, 1).await?;
        }
        Ok(promoted)
    }

    async fn compact_waitlist(&self, event_id: &EventId, vacated: u32) -> Result<()> {
        let waitlist = self
            .env
            .registrations
            .registrations_for_event(event_id, Some(RegistrationStatus::Waitlisted))
            .await?;
        let moved = promotion::close_gap(&self.env, event_id, &waitlist, vacated).await?;
        tracing::debug!(event_id = %event_id, vacated, moved, "Compacted waitlist");
        Ok(())
    }

    async fn adjust_count(&self, event_id: &EventId, delta: i32) -> Result<Option<u32>> {
        let count = self.env.events.adjust_registered_count(event_id, delta).await?;
        if count.is_none() {
            tracing::warn!(
                event_id = %event_id,
                delta,
                "Registered count not adjusted, event no longer exists"
            );
        }
        Ok(count)
    }

    async fn serialize(&self, event_id: &EventId) -> Option<EventGuard> {
        match self.settings.concurrency {
            ConcurrencyMode::Optimistic => None,
            ConcurrencyMode::SerializedPerEvent => Some(self.locks.acquire(event_id).await),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::environment::SystemClock;
    use crate::error::ConflictReason;
    use crate::memory::InMemoryStorage;
    use crate::storage::{EventRepository, RegistrationRepository, UserRepository};
    use crate::types::{NewEvent, User};
    use chrono::Utc;
    use std::sync::Arc;

    struct Harness {
        storage: Arc<InMemoryStorage>,
        engine: RegistrationEngine,
    }

    impl Harness {
        fn new(settings: RegistrationSettings) -> Self {
            let storage = Arc::new(InMemoryStorage::new());
            let env = RegistrationEnvironment::from_storage(Arc::new(SystemClock), storage.clone());
            Self {
                storage,
                engine: RegistrationEngine::new(env, settings),
            }
        }

        async fn event(&self, id: &str, capacity: u32, has_waitlist: bool) -> EventId {
            let event = NewEvent {
                event_id: EventId::new(id),
                title: id.to_string(),
                description: String::new(),
                date: "2025-06-01".to_string(),
                location: "Lisbon".to_string(),
                capacity,
                organizer: "org".to_string(),
                status: "active".to_string(),
                has_waitlist,
            }
            .into_event();
            self.storage.put_event(&event).await.unwrap();
            event.event_id
        }

        async fn user(&self, id: &str) -> UserId {
            let user = User {
                user_id: UserId::new(id),
                name: id.to_uppercase(),
                created_at: Utc::now(),
            };
            self.storage.insert_user(&user).await.unwrap();
            user.user_id
        }

        async fn count(&self, event_id: &EventId) -> u32 {
            self.storage.get_event(event_id).await.unwrap().unwrap().registered_count
        }

        async fn registration(&self, user_id: &UserId, event_id: &EventId) -> Option<Registration> {
            self.storage.get_registration(user_id, event_id).await.unwrap()
        }
    }

    #[tokio::test]
    async fn validation_order_user_then_event_then_duplicate() {
        let h = Harness::new(RegistrationSettings::default());
        let event = h.event("e1", 1, false).await;
        let missing_event = EventId::new("nope");
        let ghost = UserId::new("ghost");

        // Both missing: the user check wins.
        let err = h.engine.register(&ghost, &missing_event).await.unwrap_err();
        assert!(matches!(err, RegistrationError::NotFound { entity: Entity::User, .. }));

        let alice = h.user("alice").await;
        let err = h.engine.register(&alice, &missing_event).await.unwrap_err();
        assert!(matches!(err, RegistrationError::NotFound { entity: Entity::Event, .. }));

        h.engine.register(&alice, &event).await.unwrap();
        let err = h.engine.register(&alice, &event).await.unwrap_err();
        assert_eq!(err, RegistrationError::Conflict(ConflictReason::AlreadyRegistered));
        assert_eq!(h.count(&event).await, 1);
    }

    #[tokio::test]
    async fn full_event_without_waitlist_rejects_and_writes_nothing() {
        let h = Harness::new(RegistrationSettings::default());
        let event = h.event("e1", 2, false).await;
        let a = h.user("a").await;
        let b = h.user("b").await;
        let c = h.user("c").await;

        assert_eq!(h.engine.register(&a, &event).await.unwrap().status, RegistrationStatus::Registered);
        assert_eq!(h.engine.register(&b, &event).await.unwrap().status, RegistrationStatus::Registered);
        assert_eq!(h.count(&event).await, 2);

        let err = h.engine.register(&c, &event).await.unwrap_err();
        assert_eq!(err, RegistrationError::CapacityExceeded { event_id: event.clone() });
        assert!(h.registration(&c, &event).await.is_none());
        assert_eq!(h.count(&event).await, 2);
    }

    #[tokio::test]
    async fn waitlisted_duplicate_conflicts() {
        let h = Harness::new(RegistrationSettings::default());
        let event = h.event("e1", 0, true).await;
        let a = h.user("a").await;

        let outcome = h.engine.register(&a, &event).await.unwrap();
        assert_eq!(outcome.position, Some(1));
        assert_eq!(outcome.message(), "Event is full. Added to waitlist at position 1");

        let err = h.engine.register(&a, &event).await.unwrap_err();
        assert_eq!(err, RegistrationError::Conflict(ConflictReason::AlreadyWaitlisted));
        assert_eq!(h.count(&event).await, 0);
    }

    #[tokio::test]
    async fn unregister_registered_promotes_waitlist_head() {
        let h = Harness::new(RegistrationSettings::default());
        let event = h.event("e1", 1, true).await;
        let a = h.user("a").await;
        let b = h.user("b").await;
        let c = h.user("c").await;

        h.engine.register(&a, &event).await.unwrap();
        assert_eq!(h.engine.register(&b, &event).await.unwrap().position, Some(1));
        assert_eq!(h.engine.register(&c, &event).await.unwrap().position, Some(2));

        let outcome = h.engine.unregister(&a, &event).await.unwrap();
        assert_eq!(outcome.promoted_user, Some(b.clone()));
        assert_eq!(outcome.removed_status, RegistrationStatus::Registered);
        assert!(outcome.message().contains("promoted"));

        assert!(h.registration(&a, &event).await.is_none());
        let promoted = h.registration(&b, &event).await.unwrap();
        assert_eq!(promoted.status, RegistrationStatus::Registered);
        assert_eq!(promoted.position, None);
        assert_eq!(h.registration(&c, &event).await.unwrap().position, Some(1));
        assert_eq!(h.count(&event).await, 1);
    }

    #[tokio::test]
    async fn unregister_with_empty_waitlist_frees_the_seat() {
        let h = Harness::new(RegistrationSettings::default());
        let event = h.event("e1", 3, true).await;
        let a = h.user("a").await;

        h.engine.register(&a, &event).await.unwrap();
        assert_eq!(h.count(&event).await, 1);

        let outcome = h.engine.unregister(&a, &event).await.unwrap();
        assert_eq!(outcome.promoted_user, None);
        assert_eq!(outcome.message(), "Successfully unregistered from event");
        assert_eq!(h.count(&event).await, 0);
        assert!(h.registration(&a, &event).await.is_none());
    }

    #[tokio::test]
    async fn unregister_waitlisted_leaves_gap_by_default() {
        let h = Harness::new(RegistrationSettings::default());
        let event = h.event("e1", 0, true).await;
        let a = h.user("a").await;
        let b = h.user("b").await;
        let c = h.user("c").await;
        for user in [&a, &b, &c] {
            h.engine.register(user, &event).await.unwrap();
        }

        let outcome = h.engine.unregister(&b, &event).await.unwrap();
        assert_eq!(outcome.promoted_user, None);
        assert_eq!(outcome.removed_status, RegistrationStatus::Waitlisted);
        assert_eq!(h.registration(&a, &event).await.unwrap().position, Some(1));
        assert_eq!(h.registration(&c, &event).await.unwrap().position, Some(3));
        assert_eq!(h.count(&event).await, 0);
    }

    #[tokio::test]
    async fn unregister_waitlisted_compacts_when_enabled() {
        let h = Harness::new(RegistrationSettings {
            compact_waitlist_on_withdrawal: true,
            ..RegistrationSettings::default()
        });
        let event = h.event("e1", 0, true).await;
        let a = h.user("a").await;
        let b = h.user("b").await;
        let c = h.user("c").await;
        for user in [&a, &b, &c] {
            h.engine.register(user, &event).await.unwrap();
        }

        h.engine.unregister(&a, &event).await.unwrap();
        assert_eq!(h.registration(&b, &event).await.unwrap().position, Some(1));
        assert_eq!(h.registration(&c, &event).await.unwrap().position, Some(2));
    }

    #[tokio::test]
    async fn unregister_missing_registration_is_not_found() {
        let h = Harness::new(RegistrationSettings::default());
        let event = h.event("e1", 1, false).await;
        let a = h.user("a").await;

        let err = h.engine.unregister(&a, &event).await.unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::NotFound { entity: Entity::Registration, ref id } if id == "a/e1"
        ));
    }

    #[tokio::test]
    async fn serialized_mode_never_overshoots_capacity() {
        let h = Arc::new(Harness::new(RegistrationSettings {
            concurrency: ConcurrencyMode::SerializedPerEvent,
            ..RegistrationSettings::default()
        }));
        let event = h.event("e1", 5, true).await;
        let mut users = Vec::new();
        for i in 0..20 {
            users.push(h.user(&format!("u{i}")).await);
        }

        let tasks: Vec<_> = users
            .into_iter()
            .map(|user| {
                let h = Arc::clone(&h);
                let event = event.clone();
                tokio::spawn(async move { h.engine.register(&user, &event).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(h.count(&event).await, 5);
        let mut positions: Vec<u32> = h
            .storage
            .registrations_for_event(&event, Some(RegistrationStatus::Waitlisted))
            .await
            .unwrap()
            .into_iter()
            .filter_map(|r| r.position)
            .collect();
        positions.sort_unstable();
        assert_eq!(positions, (1..=15).collect::<Vec<u32>>());
    }
}
