//! Pure capacity decisions.
//!
//! Given a snapshot of an event and of its waitlist, decide what a new
//! registration becomes. No I/O happens here; the engine reads the inputs
//! from storage and performs the writes the decision calls for.

use crate::types::{Event, Registration};

/// What a registration request turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// A seat is free.
    Register,
    /// The event is full; join the waitlist at `position`.
    Waitlist {
        /// 1-based position to assign
        position: u32,
    },
    /// The event is full and has no waitlist.
    Reject,
}

/// Whether a new registration needs the waitlist snapshot at all.
///
/// Lets the engine skip the waitlist query when a seat is free or the event
/// has no waitlist.
#[must_use]
pub const fn needs_waitlist(event: &Event) -> bool {
    !event.has_free_slot() && event.has_waitlist
}

/// Next waitlist position: one past the highest assigned, or 1.
///
/// Based on the maximum rather than the count, so a gap left by a withdrawn
/// waitlister never causes a duplicate position.
#[must_use]
pub fn next_position<'a>(waitlist: impl IntoIterator<Item = &'a Registration>) -> u32 {
    waitlist
        .into_iter()
        .filter_map(|registration| registration.position)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Decide the outcome for a new registration.
///
/// `waitlist` is only consulted when the event is full and has a waitlist.
#[must_use]
pub fn decide<'a>(event: &Event, waitlist: impl IntoIterator<Item = &'a Registration>) -> Admission {
    if event.has_free_slot() {
        Admission::Register
    } else if event.has_waitlist {
        Admission::Waitlist {
            position: next_position(waitlist),
        }
    } else {
        Admission::Reject
    }
}
