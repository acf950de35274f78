//! Property tests for counter and waitlist invariants.
//!
//! Random register/unregister sequences run against one event; after every
//! sequence the stored counter and waitlist positions are checked.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use event_registration_core::storage::{EventRepository, RegistrationRepository};
use event_registration_core::{
    EventId, InMemoryStorage, RegistrationEngine, RegistrationSettings, RegistrationStatus, UserId,
};
use event_registration_testing::properties::{Op, ops};
use event_registration_testing::{EventBuilder, insert_user, test_environment};
use proptest::prelude::*;
use std::sync::Arc;

const USERS: usize = 8;

struct Snapshot {
    registered_count: u32,
    registered_rows: usize,
    positions: Vec<u32>,
}

async fn run(capacity: u32, settings: RegistrationSettings, steps: &[Op]) -> Snapshot {
    let (env, storage) = test_environment();
    let event = EventBuilder::new("e1")
        .capacity(capacity)
        .waitlist()
        .insert(&*storage)
        .await;
    let mut users = Vec::with_capacity(USERS);
    for i in 0..USERS {
        users.push(insert_user(&*storage, &format!("u{i}")).await);
    }
    let engine = RegistrationEngine::new(env, settings);

    for step in steps {
        // Conflicts and missing registrations are expected along the way.
        let result = match *step {
            Op::Register(i) => engine.register(&users[i], &event.event_id).await.map(|_| ()),
            Op::Unregister(i) => engine.unregister(&users[i], &event.event_id).await.map(|_| ()),
        };
        if let Err(err) = result {
            assert!(err.is_client_error(), "unexpected storage failure: {err}");
        }
    }

    snapshot(&storage, &event.event_id).await
}

async fn snapshot(storage: &Arc<InMemoryStorage>, event_id: &EventId) -> Snapshot {
    let event = storage.get_event(event_id).await.unwrap().unwrap();
    let all = storage.registrations_for_event(event_id, None).await.unwrap();
    let mut positions: Vec<u32> = all
        .iter()
        .filter(|r| r.status == RegistrationStatus::Waitlisted)
        .map(|r| r.position.expect("waitlisted registrations carry a position"))
        .collect();
    positions.sort_unstable();
    Snapshot {
        registered_count: event.registered_count,
        registered_rows: all
            .iter()
            .filter(|r| r.status == RegistrationStatus::Registered)
            .count(),
        positions,
    }
}

fn contiguous(n: usize) -> Vec<u32> {
    (1..=u32::try_from(n).unwrap()).collect()
}

proptest! {
    /// Registrations beyond capacity get gap-free positions from 1 in arrival order.
    #[test]
    fn overflow_positions_are_gap_free(capacity in 0u32..5, arrivals in 1usize..=USERS) {
        let steps: Vec<Op> = (0..arrivals).map(Op::Register).collect();
        let snap = tokio_test::block_on(run(capacity, RegistrationSettings::default(), &steps));

        let seated = arrivals.min(capacity as usize);
        prop_assert_eq!(snap.registered_count as usize, seated);
        prop_assert_eq!(snap.registered_rows, seated);
        prop_assert_eq!(snap.positions, contiguous(arrivals - seated));
    }

    /// The counter always matches the registered rows and never exceeds capacity.
    #[test]
    fn counter_tracks_registered_rows(capacity in 0u32..4, steps in ops(USERS, 40)) {
        let snap = tokio_test::block_on(run(capacity, RegistrationSettings::default(), &steps));

        prop_assert_eq!(snap.registered_count as usize, snap.registered_rows);
        prop_assert!(snap.registered_count <= capacity);

        let mut deduped = snap.positions.clone();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), snap.positions.len(), "duplicate waitlist position");
    }

    /// With compaction on, the waitlist stays contiguous and a free seat implies an empty waitlist.
    #[test]
    fn compaction_keeps_waitlist_contiguous(capacity in 0u32..4, steps in ops(USERS, 40)) {
        let settings = RegistrationSettings {
            compact_waitlist_on_withdrawal: true,
            ..RegistrationSettings::default()
        };
        let snap = tokio_test::block_on(run(capacity, settings, &steps));

        prop_assert_eq!(snap.registered_count as usize, snap.registered_rows);
        prop_assert_eq!(snap.positions.clone(), contiguous(snap.positions.len()));
        if snap.registered_count < capacity {
            prop_assert!(snap.positions.is_empty());
        }
    }
}

#[test]
fn unregistering_unknown_pair_is_not_found() {
    let (env, _) = test_environment();
    let engine = RegistrationEngine::new(env, RegistrationSettings::default());
    let err = tokio_test::block_on(engine.unregister(&UserId::new("u"), &EventId::new("e")))
        .unwrap_err();
    assert_eq!(err.to_string(), "Registration not found");
}
