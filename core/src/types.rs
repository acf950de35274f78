//! Domain types for the event registration service.
//!
//! Events, users and the registration join entity, plus the request-side
//! payloads (`NewEvent`, `EventUpdate`, `NewUser`) the catalog accepts.
//! Everything serialises as camelCase JSON so the HTTP layer can hand these
//! types straight to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Client-assigned identifier of an event.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates an `EventId` from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Client-assigned identifier of a user.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a `UserId` from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ============================================================================
// Event
// ============================================================================

/// An event users can register for.
///
/// `registered_count` is owned by the registration engine: the catalog never
/// writes it except to initialise it to zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique, immutable identifier
    pub event_id: EventId,
    /// Title
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Date of the event (ISO-8601, sorts lexicographically)
    pub date: String,
    /// Venue or location
    pub location: String,
    /// Maximum number of registered (not waitlisted) users
    pub capacity: u32,
    /// Organizer name
    pub organizer: String,
    /// Lifecycle status (e.g. "active", "cancelled")
    pub status: String,
    /// Current number of registered users
    #[serde(default)]
    pub registered_count: u32,
    /// Whether registrations beyond capacity join a waitlist
    #[serde(default)]
    pub has_waitlist: bool,
}

impl Event {
    /// Whether at least one registered slot is free.
    #[must_use]
    pub const fn has_free_slot(&self) -> bool {
        self.registered_count < self.capacity
    }
}

/// Full event body accepted on creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    /// Identifier chosen by the client
    pub event_id: EventId,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Date
    pub date: String,
    /// Location
    pub location: String,
    /// Capacity
    pub capacity: u32,
    /// Organizer
    pub organizer: String,
    /// Status
    pub status: String,
    /// Waitlist flag (defaults to `false`)
    #[serde(default)]
    pub has_waitlist: bool,
}

impl NewEvent {
    /// Materialise the stored event with an empty registration counter.
    #[must_use]
    pub fn into_event(self) -> Event {
        Event {
            event_id: self.event_id,
            title: self.title,
            description: self.description,
            date: self.date,
            location: self.location,
            capacity: self.capacity,
            organizer: self.organizer,
            status: self.status,
            registered_count: 0,
            has_waitlist: self.has_waitlist,
        }
    }
}

/// Partial update of an event's descriptive fields.
///
/// Absent fields are left untouched. There is deliberately no
/// `registered_count` field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// New location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// New capacity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// New organizer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    /// New status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Enable or disable the waitlist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_waitlist: Option<bool>,
}

impl EventUpdate {
    /// `true` when no field is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.capacity.is_none()
            && self.organizer.is_none()
            && self.status.is_none()
            && self.has_waitlist.is_none()
    }

    /// Apply the present fields to `event` in place.
    pub fn apply_to(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            event.description.clone_from(description);
        }
        if let Some(date) = &self.date {
            event.date.clone_from(date);
        }
        if let Some(location) = &self.location {
            event.location.clone_from(location);
        }
        if let Some(capacity) = self.capacity {
            event.capacity = capacity;
        }
        if let Some(organizer) = &self.organizer {
            event.organizer.clone_from(organizer);
        }
        if let Some(status) = &self.status {
            event.status.clone_from(status);
        }
        if let Some(has_waitlist) = self.has_waitlist {
            event.has_waitlist = has_waitlist;
        }
    }
}

// ============================================================================
// User
// ============================================================================

/// A user who can register for events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub user_id: UserId,
    /// Display name
    pub name: String,
    /// Server-assigned creation time
    pub created_at: DateTime<Utc>,
}

/// User body accepted on creation. `createdAt` is assigned by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Identifier chosen by the client
    pub user_id: UserId,
    /// Display name
    pub name: String,
}

// ============================================================================
// Registration
// ============================================================================

/// Where a registration currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    /// Holds one of the event's seats
    Registered,
    /// Queued behind a full event
    Waitlisted,
}

impl RegistrationStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Waitlisted => "waitlisted",
        }
    }

    /// Parse the storage representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "registered" => Some(Self::Registered),
            "waitlisted" => Some(Self::Waitlisted),
            _ => None,
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The join between a user and an event.
///
/// `position` is `Some` exactly when `status` is `Waitlisted`; the
/// constructors keep that pairing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Registered user
    pub user_id: UserId,
    /// Target event
    pub event_id: EventId,
    /// Current status
    pub status: RegistrationStatus,
    /// 1-based waitlist rank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    /// Creation time
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    /// A registration that holds a seat.
    #[must_use]
    pub fn registered(user_id: UserId, event_id: EventId, registered_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            event_id,
            status: RegistrationStatus::Registered,
            position: None,
            registered_at,
        }
    }

    /// A registration queued at `position`.
    #[must_use]
    pub fn waitlisted(
        user_id: UserId,
        event_id: EventId,
        position: u32,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            event_id,
            status: RegistrationStatus::Waitlisted,
            position: Some(position),
            registered_at,
        }
    }

    /// Same registration moved to the registered state, position cleared.
    #[must_use]
    pub fn promoted(self) -> Self {
        Self {
            status: RegistrationStatus::Registered,
            position: None,
            ..self
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_event() -> Event {
        NewEvent {
            event_id: EventId::new("e1"),
            title: "RustConf".to_string(),
            description: "Talks".to_string(),
            date: "2025-09-01".to_string(),
            location: "Montreal".to_string(),
            capacity: 2,
            organizer: "Rust Foundation".to_string(),
            status: "active".to_string(),
            has_waitlist: false,
        }
        .into_event()
    }

    #[test]
    fn new_event_starts_with_zero_registrations() {
        let event = sample_event();
        assert_eq!(event.registered_count, 0);
        assert!(event.has_free_slot());
    }

    #[test]
    fn event_update_applies_only_present_fields() {
        let mut event = sample_event();
        let update = EventUpdate {
            title: Some("RustConf 2025".to_string()),
            capacity: Some(10),
            ..EventUpdate::default()
        };
        assert!(!update.is_empty());

        update.apply_to(&mut event);
        assert_eq!(event.title, "RustConf 2025");
        assert_eq!(event.capacity, 10);
        assert_eq!(event.location, "Montreal");
        assert!(EventUpdate::default().is_empty());
    }

    #[test]
    fn event_serialises_as_camel_case() {
        let json = serde_json::to_value(sample_event()).unwrap();
        assert_eq!(json["eventId"], "e1");
        assert_eq!(json["registeredCount"], 0);
        assert_eq!(json["hasWaitlist"], false);
    }

    #[test]
    fn new_event_waitlist_defaults_to_false() {
        let body = r#"{"eventId":"e2","title":"t","description":"d","date":"2025-01-01",
            "location":"l","capacity":5,"organizer":"o","status":"active"}"#;
        let new_event: NewEvent = serde_json::from_str(body).unwrap();
        assert!(!new_event.has_waitlist);
    }

    #[test]
    fn promotion_clears_position() {
        let reg = Registration::waitlisted(
            UserId::new("u1"),
            EventId::new("e1"),
            1,
            Utc::now(),
        );
        assert_eq!(reg.status, RegistrationStatus::Waitlisted);

        let promoted = reg.promoted();
        assert_eq!(promoted.status, RegistrationStatus::Registered);
        assert_eq!(promoted.position, None);

        let json = serde_json::to_value(&promoted).unwrap();
        assert!(json.get("position").is_none());
        assert_eq!(json["status"], "registered");
    }

    #[test]
    fn status_round_trips_through_storage_strings() {
        for status in [RegistrationStatus::Registered, RegistrationStatus::Waitlisted] {
            assert_eq!(RegistrationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RegistrationStatus::parse("pending"), None);
    }
}
