//! # Event Registration Core
//!
//! Domain types, storage contracts and engines for an event-registration
//! service that enforces per-event capacity with an optional FIFO waitlist.
//!
//! ## Core Concepts
//!
//! - **Event**: a resource with a `capacity` and a `registered_count`
//! - **Registration**: the `(user, event)` join, either registered or
//!   waitlisted at a 1-based position
//! - **Admission**: pure decision of what a new registration becomes
//! - **Promotion**: the waitlist head taking a freed seat
//! - **Environment**: injected storage collections and clock
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell: [`admission`] decides, [`engine`] does the I/O
//! - Dependency Injection via [`RegistrationEnvironment`]
//! - Storage promises single-item atomicity only; multi-step sequences are
//!   unisolated unless [`ConcurrencyMode::SerializedPerEvent`] is selected
//!
//! ## Example
//!
//! ```
//! use event_registration_core::*;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let storage = Arc::new(InMemoryStorage::new());
//! let env = RegistrationEnvironment::from_storage(Arc::new(SystemClock), storage);
//! let catalog = Catalog::new(env.clone());
//! let engine = RegistrationEngine::new(env, RegistrationSettings::default());
//!
//! catalog
//!     .create_event(NewEvent {
//!         event_id: EventId::new("rustconf"),
//!         title: "RustConf".into(),
//!         description: String::new(),
//!         date: "2025-09-02".into(),
//!         location: "Seattle".into(),
//!         capacity: 1,
//!         organizer: "Rust Foundation".into(),
//!         status: "active".into(),
//!         has_waitlist: true,
//!     })
//!     .await?;
//! for id in ["ferris", "corro"] {
//!     catalog.create_user(NewUser { user_id: UserId::new(id), name: id.into() }).await?;
//! }
//!
//! let first = engine.register(&UserId::new("ferris"), &EventId::new("rustconf")).await?;
//! let second = engine.register(&UserId::new("corro"), &EventId::new("rustconf")).await?;
//! assert_eq!(first.status, RegistrationStatus::Registered);
//! assert_eq!(second.position, Some(1));
//!
//! let left = engine.unregister(&UserId::new("ferris"), &EventId::new("rustconf")).await?;
//! assert_eq!(left.promoted_user, Some(UserId::new("corro")));
//! # Ok::<(), RegistrationError>(())
//! # }).unwrap();
//! ```

pub mod admission;
pub mod catalog;
pub mod engine;
pub mod environment;
pub mod error;
pub mod locks;
pub mod memory;
pub mod precondition;
pub mod projection;
pub mod promotion;
pub mod storage;
pub mod types;

pub use catalog::Catalog;
pub use engine::{RegisterOutcome, RegistrationEngine, UnregisterOutcome};
pub use environment::{
    Clock, ConcurrencyMode, RegistrationEnvironment, RegistrationSettings, SystemClock,
};
pub use error::{ConflictReason, Entity, RegistrationError, Result, StorageError};
pub use memory::InMemoryStorage;
pub use projection::{Projections, RegisteredEventView, RegisteredUserView};
pub use storage::{
    EventRepository, InsertOutcome, RegistrationRepository, StorageResult, UserRepository,
};
pub use types::{
    Event, EventId, EventUpdate, NewEvent, NewUser, Registration, RegistrationStatus, User,
    UserId,
};
