//! In-memory storage backend.
//!
//! Keeps the three collections in one `RwLock`-guarded set of maps. Every
//! trait call takes the lock once, so each call is atomic on its own, which
//! is exactly the guarantee the storage contracts promise.

use crate::error::StorageError;
use crate::storage::{
    EventRepository, InsertOutcome, RegistrationRepository, StorageResult, UserRepository,
};
use crate::types::{Event, EventId, EventUpdate, Registration, RegistrationStatus, User, UserId};
use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    events: BTreeMap<EventId, Event>,
    users: BTreeMap<UserId, User>,
    registrations: BTreeMap<(UserId, EventId), Registration>,
}

/// Process-local storage for all three collections.
///
/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StorageError::backend("in-memory storage lock poisoned"))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StorageError::backend("in-memory storage lock poisoned"))
    }
}

impl EventRepository for InMemoryStorage {
    fn get_event<'a>(&'a self, event_id: &'a EventId) -> BoxFuture<'a, StorageResult<Option<Event>>> {
        Box::pin(async move { Ok(self.read()?.events.get(event_id).cloned()) })
    }

    fn list_events<'a>(&'a self, status: Option<&'a str>) -> BoxFuture<'a, StorageResult<Vec<Event>>> {
        Box::pin(async move {
            Ok(self
                .read()?
                .events
                .values()
                .filter(|event| status.is_none_or(|status| event.status == status))
                .cloned()
                .collect())
        })
    }

    fn put_event<'a>(&'a self, event: &'a Event) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            self.write()?.events.insert(event.event_id.clone(), event.clone());
            Ok(())
        })
    }

    fn update_event<'a>(
        &'a self,
        event_id: &'a EventId,
        update: &'a EventUpdate,
    ) -> BoxFuture<'a, StorageResult<Option<Event>>> {
        Box::pin(async move {
            let mut tables = self.write()?;
            Ok(tables.events.get_mut(event_id).map(|event| {
                update.apply_to(event);
                event.clone()
            }))
        })
    }

    fn delete_event<'a>(&'a self, event_id: &'a EventId) -> BoxFuture<'a, StorageResult<bool>> {
        Box::pin(async move { Ok(self.write()?.events.remove(event_id).is_some()) })
    }

    fn adjust_registered_count<'a>(
        &'a self,
        event_id: &'a EventId,
        delta: i32,
    ) -> BoxFuture<'a, StorageResult<Option<u32>>> {
        Box::pin(async move {
            let mut tables = self.write()?;
            let Some(event) = tables.events.get_mut(event_id) else {
                return Ok(None);
            };
            let adjusted = event.registered_count.checked_add_signed(delta).ok_or_else(|| {
                StorageError::backend(format!(
                    "registered count of {event_id} cannot be adjusted by {delta}"
                ))
            })?;
            event.registered_count = adjusted;
            Ok(Some(adjusted))
        })
    }
}

impl UserRepository for InMemoryStorage {
    fn get_user<'a>(&'a self, user_id: &'a UserId) -> BoxFuture<'a, StorageResult<Option<User>>> {
        Box::pin(async move { Ok(self.read()?.users.get(user_id).cloned()) })
    }

    fn list_users(&self) -> BoxFuture<'_, StorageResult<Vec<User>>> {
        Box::pin(async move { Ok(self.read()?.users.values().cloned().collect()) })
    }

    fn insert_user<'a>(&'a self, user: &'a User) -> BoxFuture<'a, StorageResult<InsertOutcome>> {
        Box::pin(async move {
            let mut tables = self.write()?;
            if tables.users.contains_key(&user.user_id) {
                return Ok(InsertOutcome::AlreadyExists);
            }
            tables.users.insert(user.user_id.clone(), user.clone());
            Ok(InsertOutcome::Inserted)
        })
    }
}

impl RegistrationRepository for InMemoryStorage {
    fn get_registration<'a>(
        &'a self,
        user_id: &'a UserId,
        event_id: &'a EventId,
    ) -> BoxFuture<'a, StorageResult<Option<Registration>>> {
        Box::pin(async move {
            Ok(self
                .read()?
                .registrations
                .get(&(user_id.clone(), event_id.clone()))
                .cloned())
        })
    }

    fn put_registration<'a>(&'a self, registration: &'a Registration) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            self.write()?.registrations.insert(
                (registration.user_id.clone(), registration.event_id.clone()),
                registration.clone(),
            );
            Ok(())
        })
    }

    fn delete_registration<'a>(
        &'a self,
        user_id: &'a UserId,
        event_id: &'a EventId,
    ) -> BoxFuture<'a, StorageResult<bool>> {
        Box::pin(async move {
            Ok(self
                .write()?
                .registrations
                .remove(&(user_id.clone(), event_id.clone()))
                .is_some())
        })
    }

    fn set_position<'a>(
        &'a self,
        user_id: &'a UserId,
        event_id: &'a EventId,
        position: u32,
    ) -> BoxFuture<'a, StorageResult<bool>> {
        Box::pin(async move {
            let mut tables = self.write()?;
            let key = (user_id.clone(), event_id.clone());
            let Some(registration) = tables.registrations.get_mut(&key) else {
                return Ok(false);
            };
            registration.position = Some(position);
            Ok(true)
        })
    }

    fn registrations_for_event<'a>(
        &'a self,
        event_id: &'a EventId,
        status: Option<RegistrationStatus>,
    ) -> BoxFuture<'a, StorageResult<Vec<Registration>>> {
        Box::pin(async move {
            Ok(self
                .read()?
                .registrations
                .values()
                .filter(|r| &r.event_id == event_id && status.is_none_or(|s| r.status == s))
                .cloned()
                .collect())
        })
    }

    fn registrations_for_user<'a>(
        &'a self,
        user_id: &'a UserId,
        status: Option<RegistrationStatus>,
    ) -> BoxFuture<'a, StorageResult<Vec<Registration>>> {
        Box::pin(async move {
            Ok(self
                .read()?
                .registrations
                .range((user_id.clone(), EventId::new(""))..)
                .take_while(|((owner, _), _)| owner == user_id)
                .map(|(_, registration)| registration)
                .filter(|r| status.is_none_or(|s| r.status == s))
                .cloned()
                .collect())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::NewEvent;
    use chrono::Utc;

    fn event(id: &str, status: &str) -> Event {
        NewEvent {
            event_id: EventId::new(id),
            title: id.to_string(),
            description: String::new(),
            date: "2025-01-01".to_string(),
            location: "Oslo".to_string(),
            capacity: 2,
            organizer: "org".to_string(),
            status: status.to_string(),
            has_waitlist: false,
        }
        .into_event()
    }

    #[tokio::test]
    async fn list_events_filters_by_status() {
        let storage = InMemoryStorage::new();
        storage.put_event(&event("a", "active")).await.unwrap();
        storage.put_event(&event("b", "cancelled")).await.unwrap();

        assert_eq!(storage.list_events(None).await.unwrap().len(), 2);
        let active = storage.list_events(Some("active")).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].event_id, EventId::new("a"));
    }

    #[tokio::test]
    async fn adjust_count_is_checked() {
        let storage = InMemoryStorage::new();
        let e = event("a", "active");
        storage.put_event(&e).await.unwrap();

        assert_eq!(storage.adjust_registered_count(&e.event_id, 1).await.unwrap(), Some(1));
        assert_eq!(storage.adjust_registered_count(&e.event_id, -1).await.unwrap(), Some(0));
        assert!(storage.adjust_registered_count(&e.event_id, -1).await.is_err());
        assert_eq!(
            storage.adjust_registered_count(&EventId::new("missing"), 1).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn insert_user_is_conditional() {
        let storage = InMemoryStorage::new();
        let user = User {
            user_id: UserId::new("u1"),
            name: "First".to_string(),
            created_at: Utc::now(),
        };
        let impostor = User {
            name: "Second".to_string(),
            ..user.clone()
        };

        assert_eq!(storage.insert_user(&user).await.unwrap(), InsertOutcome::Inserted);
        assert_eq!(storage.insert_user(&impostor).await.unwrap(), InsertOutcome::AlreadyExists);
        assert_eq!(storage.get_user(&user.user_id).await.unwrap().unwrap().name, "First");
    }

    #[tokio::test]
    async fn secondary_lookups_filter_by_key_and_status() {
        let storage = InMemoryStorage::new();
        let now = Utc::now();
        let (u1, u2) = (UserId::new("u1"), UserId::new("u2"));
        let (e1, e2) = (EventId::new("e1"), EventId::new("e2"));
        for registration in [
            Registration::registered(u1.clone(), e1.clone(), now),
            Registration::waitlisted(u1.clone(), e2.clone(), 1, now),
            Registration::waitlisted(u2.clone(), e1.clone(), 1, now),
        ] {
            storage.put_registration(&registration).await.unwrap();
        }

        assert_eq!(storage.registrations_for_event(&e1, None).await.unwrap().len(), 2);
        assert_eq!(
            storage
                .registrations_for_event(&e1, Some(RegistrationStatus::Waitlisted))
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(storage.registrations_for_user(&u1, None).await.unwrap().len(), 2);
        assert_eq!(storage.registrations_for_user(&u2, None).await.unwrap().len(), 1);

        assert!(storage.set_position(&u2, &e1, 4).await.unwrap());
        assert!(!storage.set_position(&u2, &e2, 4).await.unwrap());
        assert!(storage.delete_registration(&u1, &e1).await.unwrap());
        assert!(!storage.delete_registration(&u1, &e1).await.unwrap());
        assert!(storage.get_registration(&u1, &e1).await.unwrap().is_none());
        assert_eq!(storage.registrations_for_user(&u1, None).await.unwrap().len(), 1);
    }
}
