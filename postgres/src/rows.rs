//! Row types and their conversion into domain records.

use chrono::{DateTime, Utc};
use event_registration_core::error::StorageError;
use event_registration_core::types::{Event, Registration, RegistrationStatus, User};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct EventRow {
    event_id: String,
    title: String,
    description: String,
    date: String,
    location: String,
    capacity: i32,
    organizer: String,
    status: String,
    registered_count: i32,
    has_waitlist: bool,
}

impl TryFrom<EventRow> for Event {
    type Error = StorageError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Self {
            capacity: non_negative("capacity", row.capacity)?,
            registered_count: non_negative("registered_count", row.registered_count)?,
            event_id: row.event_id.into(),
            title: row.title,
            description: row.description,
            date: row.date,
            location: row.location,
            organizer: row.organizer,
            status: row.status,
            has_waitlist: row.has_waitlist,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    user_id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id.into(),
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RegistrationRow {
    user_id: String,
    event_id: String,
    status: String,
    position: Option<i32>,
    registered_at: DateTime<Utc>,
}

impl TryFrom<RegistrationRow> for Registration {
    type Error = StorageError;

    fn try_from(row: RegistrationRow) -> Result<Self, Self::Error> {
        let status = RegistrationStatus::parse(&row.status)
            .ok_or_else(|| StorageError::Corrupt(format!("unknown registration status {}", row.status)))?;
        let position = row
            .position
            .map(|position| non_negative("position", position))
            .transpose()?;
        Ok(Self {
            user_id: row.user_id.into(),
            event_id: row.event_id.into(),
            status,
            position,
            registered_at: row.registered_at,
        })
    }
}

pub(crate) fn non_negative(field: &str, value: i32) -> Result<u32, StorageError> {
    u32::try_from(value).map_err(|_| StorageError::Corrupt(format!("{field} is negative: {value}")))
}
