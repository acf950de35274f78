//! Waitlist promotion.
//!
//! When a registered seat frees up, the registration at waitlist position 1
//! takes it and everyone behind moves up one place. This is a read of the
//! whole waitlist followed by one write per registration; outside the
//! per-event lock two promotions for the same event can interleave.

use crate::environment::RegistrationEnvironment;
use crate::error::Result;
use crate::types::{EventId, Registration, RegistrationStatus, UserId};

/// Promote the head of `event_id`'s waitlist.
///
/// Returns the promoted user, or `None` when no registration sits at
/// position 1. Does not touch the event's `registered_count`; the caller owns
/// the seat accounting.
///
/// # Errors
///
/// Returns [`crate::RegistrationError::Storage`] if any read or write fails.
/// Writes already made are not rolled back.
pub async fn promote_next(
    env: &RegistrationEnvironment,
    event_id: &EventId,
) -> Result<Option<UserId>> {
    let waitlist = env
        .registrations
        .registrations_for_event(event_id, Some(RegistrationStatus::Waitlisted))
        .await?;

    let Some(head) = waitlist
        .iter()
        .find(|registration| registration.position == Some(1))
        .cloned()
    else {
        tracing::debug!(event_id = %event_id, waiting = waitlist.len(), "No waitlist head to promote");
        return Ok(None);
    };

    let promoted_user = head.user_id.clone();
    env.registrations.put_registration(&head.promoted()).await?;

    let remaining: Vec<Registration> = waitlist
        .into_iter()
        .filter(|registration| registration.user_id != promoted_user)
        .collect();
    let moved = close_gap(env, event_id, &remaining, 1).await?;

    tracing::info!(
        event_id = %event_id,
        promoted_user = %promoted_user,
        renumbered = moved,
        "Promoted waitlisted user"
    );
    metrics::counter!("registration_promotions_total").increment(1);

    Ok(Some(promoted_user))
}

/// Move every registration in `waitlist` whose position is behind `vacated`
/// up by one. Returns how many were moved.
///
/// # Errors
///
/// Returns [`crate::RegistrationError::Storage`] if a write fails.
pub async fn close_gap(
    env: &RegistrationEnvironment,
    event_id: &EventId,
    waitlist: &[Registration],
    vacated: u32,
) -> Result<usize> {
    let mut moved = 0;
    for registration in waitlist {
        let Some(position) = registration.position else {
            continue;
        };
        if position <= vacated {
            continue;
        }
        let updated = env
            .registrations
            .set_position(&registration.user_id, event_id, position - 1)
            .await?;
        if updated {
            moved += 1;
        } else {
            tracing::warn!(
                event_id = %event_id,
                user_id = %registration.user_id,
                "Waitlisted registration vanished during renumbering"
            );
        }
    }
    Ok(moved)
}
