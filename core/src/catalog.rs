//! Event and user records.
//!
//! Thin wrappers over the storage traits with the existence and emptiness
//! checks the HTTP surface needs. Nothing here touches registrations or
//! `registered_count` beyond initialising it.

use crate::environment::RegistrationEnvironment;
use crate::error::{ConflictReason, Entity, RegistrationError, Result};
use crate::precondition::require;
use crate::storage::InsertOutcome;
use crate::types::{Event, EventId, EventUpdate, NewEvent, NewUser, User, UserId};

/// CRUD operations on events and users.
#[derive(Clone)]
pub struct Catalog {
    env: RegistrationEnvironment,
}

impl Catalog {
    /// Creates a new catalog.
    #[must_use]
    pub const fn new(env: RegistrationEnvironment) -> Self {
        Self { env }
    }

    /// Store a new event with an empty registration counter.
    ///
    /// An existing event with the same id is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::Storage`] if the backend fails.
    pub async fn create_event(&self, new_event: NewEvent) -> Result<Event> {
        let event = new_event.into_event();
        self.env.events.put_event(&event).await?;

        tracing::info!(event_id = %event.event_id, capacity = event.capacity, "Event created");
        metrics::counter!("catalog_events_created_total").increment(1);
        Ok(event)
    }

    /// # Errors
    ///
    /// Returns [`RegistrationError::NotFound`] if the event does not exist.
    pub async fn get_event(&self, event_id: &EventId) -> Result<Event> {
        require(self.env.events.get_event(event_id).await?, Entity::Event, event_id)
    }

    /// List events, optionally only those with the given `status`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::Storage`] if the backend fails.
    pub async fn list_events(&self, status: Option<&str>) -> Result<Vec<Event>> {
        Ok(self.env.events.list_events(status).await?)
    }

    /// Apply a partial update to an event's descriptive fields.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::NotFound`] if the event does not exist
    /// - [`RegistrationError::Validation`] if `update` carries no field
    pub async fn update_event(&self, event_id: &EventId, update: &EventUpdate) -> Result<Event> {
        require(self.env.events.get_event(event_id).await?, Entity::Event, event_id)?;
        if update.is_empty() {
            return Err(RegistrationError::Validation("No fields to update".to_string()));
        }
        let event = require(
            self.env.events.update_event(event_id, update).await?,
            Entity::Event,
            event_id,
        )?;
        tracing::debug!(event_id = %event_id, "Event updated");
        Ok(event)
    }

    /// Delete an event. Its registrations are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::NotFound`] if the event does not exist.
    pub async fn delete_event(&self, event_id: &EventId) -> Result<()> {
        if !self.env.events.delete_event(event_id).await? {
            return Err(RegistrationError::not_found(Entity::Event, event_id));
        }
        tracing::info!(event_id = %event_id, "Event deleted");
        Ok(())
    }

    /// Create a user, stamping `created_at` from the clock.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::Conflict`] if the id is taken.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let user = User {
            user_id: new_user.user_id,
            name: new_user.name,
            created_at: self.env.clock.now(),
        };
        match self.env.users.insert_user(&user).await? {
            InsertOutcome::Inserted => {
                tracing::info!(user_id = %user.user_id, "User created");
                metrics::counter!("catalog_users_created_total").increment(1);
                Ok(user)
            }
            InsertOutcome::AlreadyExists => {
                Err(RegistrationError::Conflict(ConflictReason::UserExists))
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`RegistrationError::NotFound`] if the user does not exist.
    pub async fn get_user(&self, user_id: &UserId) -> Result<User> {
        require(self.env.users.get_user(user_id).await?, Entity::User, user_id)
    }

    /// # Errors
    ///
    /// Returns [`RegistrationError::Storage`] if the backend fails.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.env.users.list_users().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::environment::SystemClock;
    use crate::memory::InMemoryStorage;
    use crate::storage::EventRepository;
    use std::sync::Arc;

    fn catalog() -> (Catalog, Arc<InMemoryStorage>) {
        let storage = Arc::new(InMemoryStorage::new());
        let env = RegistrationEnvironment::from_storage(Arc::new(SystemClock), storage.clone());
        (Catalog::new(env), storage)
    }

    fn new_event(id: &str) -> NewEvent {
        NewEvent {
            event_id: EventId::new(id),
            title: "RustConf".to_string(),
            description: "Talks".to_string(),
            date: "2025-09-02".to_string(),
            location: "Seattle".to_string(),
            capacity: 10,
            organizer: "Rust Foundation".to_string(),
            status: "active".to_string(),
            has_waitlist: true,
        }
    }

    #[tokio::test]
    async fn create_event_resets_counter_and_overwrites() {
        let (catalog, storage) = catalog();
        let event = catalog.create_event(new_event("e1")).await.unwrap();
        assert_eq!(event.registered_count, 0);

        storage.adjust_registered_count(&event.event_id, 3).await.unwrap();
        let replaced = catalog.create_event(new_event("e1")).await.unwrap();
        assert_eq!(replaced.registered_count, 0);
        assert_eq!(catalog.get_event(&event.event_id).await.unwrap().registered_count, 0);
    }

    #[tokio::test]
    async fn missing_event_wins_over_empty_update() {
        let (catalog, _) = catalog();
        let err = catalog
            .update_event(&EventId::new("missing"), &EventUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::NotFound { entity: Entity::Event, .. }));

        catalog.create_event(new_event("e1")).await.unwrap();
        let err = catalog
            .update_event(&EventId::new("e1"), &EventUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err, RegistrationError::Validation("No fields to update".to_string()));
    }

    #[tokio::test]
    async fn update_applies_present_fields_only() {
        let (catalog, _) = catalog();
        let event = catalog.create_event(new_event("e1")).await.unwrap();

        let update = EventUpdate {
            title: Some("RustConf 2025".to_string()),
            ..EventUpdate::default()
        };
        let updated = catalog.update_event(&event.event_id, &update).await.unwrap();
        assert_eq!(updated.title, "RustConf 2025");
        assert_eq!(updated.location, "Seattle");

        let err = catalog.update_event(&EventId::new("missing"), &update).await.unwrap_err();
        assert!(matches!(err, RegistrationError::NotFound { entity: Entity::Event, .. }));
    }

    #[tokio::test]
    async fn delete_missing_event_is_not_found() {
        let (catalog, _) = catalog();
        catalog.create_event(new_event("e1")).await.unwrap();
        catalog.delete_event(&EventId::new("e1")).await.unwrap();
        let err = catalog.delete_event(&EventId::new("e1")).await.unwrap_err();
        assert_eq!(err, RegistrationError::not_found(Entity::Event, "e1"));
    }

    #[tokio::test]
    async fn duplicate_user_conflicts() {
        let (catalog, _) = catalog();
        let new_user = NewUser {
            user_id: UserId::new("u1"),
            name: "Ferris".to_string(),
        };
        catalog.create_user(new_user.clone()).await.unwrap();
        let err = catalog.create_user(new_user).await.unwrap_err();
        assert_eq!(err, RegistrationError::Conflict(ConflictReason::UserExists));
        assert_eq!(catalog.list_users().await.unwrap().len(), 1);
    }
}
