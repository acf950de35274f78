//! Read-side joins over registrations.
//!
//! Each view looks up the owning entity (404 if absent), queries its
//! registrations by status, joins the record on the other side and sorts the
//! result. Registrations whose joined record has since been deleted are
//! skipped and logged.
//!
//! | View | Owner | Joined | Sorted by |
//! |------|-------|--------|-----------|
//! | [`Projections::user_registrations`] | user | events | event date |
//! | [`Projections::user_waitlist`] | user | events | event date |
//! | [`Projections::event_registrations`] | event | users | registration time |
//! | [`Projections::event_waitlist`] | event | users | waitlist position |

use crate::environment::RegistrationEnvironment;
use crate::error::{Entity, Result};
use crate::precondition::require;
use crate::types::{Event, EventId, Registration, RegistrationStatus, User, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// An event as seen from one of its registrants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredEventView {
    /// The joined event
    #[serde(flatten)]
    pub event: Event,
    /// The user's registration status for it
    pub registration_status: RegistrationStatus,
    /// When the user registered
    pub registered_at: DateTime<Utc>,
    /// The user's waitlist position, when waitlisted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waitlist_position: Option<u32>,
}

/// A user as seen from an event they registered for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUserView {
    /// The joined user
    #[serde(flatten)]
    pub user: User,
    /// Registration status for the event
    pub registration_status: RegistrationStatus,
    /// When the user registered
    pub registered_at: DateTime<Utc>,
    /// Waitlist position, when waitlisted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waitlist_position: Option<u32>,
}

/// The four joined read views.
#[derive(Clone)]
pub struct Projections {
    env: RegistrationEnvironment,
}

impl Projections {
    /// Creates a new projection reader.
    #[must_use]
    pub const fn new(env: RegistrationEnvironment) -> Self {
        Self { env }
    }

    /// Events the user holds a seat for, by event date.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistrationError::NotFound`] if the user does not exist.
    pub async fn user_registrations(&self, user_id: &UserId) -> Result<Vec<RegisteredEventView>> {
        self.events_of(user_id, RegistrationStatus::Registered).await
    }

    /// Events the user is waitlisted for, by event date.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistrationError::NotFound`] if the user does not exist.
    pub async fn user_waitlist(&self, user_id: &UserId) -> Result<Vec<RegisteredEventView>> {
        self.events_of(user_id, RegistrationStatus::Waitlisted).await
    }

    /// Users holding a seat for the event, earliest registration first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistrationError::NotFound`] if the event does not exist.
    pub async fn event_registrations(&self, event_id: &EventId) -> Result<Vec<RegisteredUserView>> {
        let mut views = self.users_of(event_id, RegistrationStatus::Registered).await?;
        views.sort_by(|a, b| {
            a.registered_at
                .cmp(&b.registered_at)
                .then_with(|| a.user.user_id.cmp(&b.user.user_id))
        });
        Ok(views)
    }

    /// Users on the event's waitlist, by position.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistrationError::NotFound`] if the event does not exist.
    pub async fn event_waitlist(&self, event_id: &EventId) -> Result<Vec<RegisteredUserView>> {
        let mut views = self.users_of(event_id, RegistrationStatus::Waitlisted).await?;
        views.sort_by_key(|view| view.waitlist_position);
        Ok(views)
    }

    async fn events_of(
        &self,
        user_id: &UserId,
        status: RegistrationStatus,
    ) -> Result<Vec<RegisteredEventView>> {
        require(self.env.users.get_user(user_id).await?, Entity::User, user_id)?;
        let registrations = self
            .env
            .registrations
            .registrations_for_user(user_id, Some(status))
            .await?;

        let mut views = Vec::with_capacity(registrations.len());
        for registration in registrations {
            let Some(event) = self.env.events.get_event(&registration.event_id).await? else {
                dangling(&registration, Entity::Event);
                continue;
            };
            views.push(RegisteredEventView {
                event,
                registration_status: registration.status,
                registered_at: registration.registered_at,
                waitlist_position: registration.position,
            });
        }
        views.sort_by(|a, b| {
            a.event
                .date
                .cmp(&b.event.date)
                .then_with(|| a.event.event_id.cmp(&b.event.event_id))
        });
        Ok(views)
    }

    async fn users_of(
        &self,
        event_id: &EventId,
        status: RegistrationStatus,
    ) -> Result<Vec<RegisteredUserView>> {
        require(self.env.events.get_event(event_id).await?, Entity::Event, event_id)?;
        let registrations = self
            .env
            .registrations
            .registrations_for_event(event_id, Some(status))
            .await?;

        let mut views = Vec::with_capacity(registrations.len());
        for registration in registrations {
            let Some(user) = self.env.users.get_user(&registration.user_id).await? else {
                dangling(&registration, Entity::User);
                continue;
            };
            views.push(RegisteredUserView {
                user,
                registration_status: registration.status,
                registered_at: registration.registered_at,
                waitlist_position: registration.position,
            });
        }
        Ok(views)
    }
}

fn dangling(registration: &Registration, missing: Entity) {
    tracing::warn!(
        user_id = %registration.user_id,
        event_id = %registration.event_id,
        missing = %missing,
        "Skipping registration whose joined record no longer exists"
    );
}
