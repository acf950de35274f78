//! Existence checks composed ahead of every mutation.
//!
//! Each check turns a storage lookup into either the value the caller needs
//! or the typed error the request fails with.

use crate::error::{ConflictReason, Entity, RegistrationError, Result};
use crate::types::{Registration, RegistrationStatus};
use std::fmt;

/// Require that a lookup found something.
///
/// # Errors
///
/// Returns [`RegistrationError::NotFound`] for `entity` when `record` is `None`.
pub fn require<T>(record: Option<T>, entity: Entity, id: impl fmt::Display) -> Result<T> {
    record.ok_or_else(|| RegistrationError::not_found(entity, id))
}

/// Require that no registration exists yet for the pair.
///
/// # Errors
///
/// Returns [`RegistrationError::Conflict`] naming the existing status.
pub fn ensure_unregistered(existing: Option<&Registration>) -> Result<()> {
    match existing.map(|registration| registration.status) {
        None => Ok(()),
        Some(RegistrationStatus::Registered) => {
            Err(RegistrationError::Conflict(ConflictReason::AlreadyRegistered))
        }
        Some(RegistrationStatus::Waitlisted) => {
            Err(RegistrationError::Conflict(ConflictReason::AlreadyWaitlisted))
        }
    }
}
