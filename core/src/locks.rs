//! Per-event serialization.
//!
//! One async mutex per event id. Holding the guard means no other
//! register/unregister for that event is between its reads and writes.
//! Requests for different events never contend.

use crate::types::EventId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;

/// Guard held for the duration of one engine operation.
pub type EventGuard = OwnedMutexGuard<()>;

/// Lazily created mutexes keyed by event id.
#[derive(Debug, Default)]
pub struct EventLocks {
    locks: Mutex<HashMap<EventId, Arc<tokio::sync::Mutex<()>>>>,
}

impl EventLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `event_id`.
    pub async fn acquire(&self, event_id: &EventId) -> EventGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Entries nobody holds or waits on are only referenced by the map.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(event_id.clone()).or_default())
        };
        lock.lock_owned().await
    }
}
