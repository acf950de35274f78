//! Event registration service.
//!
//! An HTTP API for registering users to capacity-limited events. When an
//! event is full, users either get turned away or join a first-come,
//! first-served waitlist; a freed seat goes to the head of that waitlist.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP (axum)   api::{events, users, registrations, views} │
//! ├──────────────────────────────────────────────────────────┤
//! │  Core          RegistrationEngine  Catalog  Projections  │
//! ├──────────────────────────────────────────────────────────┤
//! │  Storage       InMemoryStorage  |  PostgresStorage       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```bash
//! # In-memory storage
//! cargo run --bin event-registration-server
//!
//! # PostgreSQL
//! STORAGE_BACKEND=postgres DATABASE_URL=postgres://localhost/events \
//!     cargo run --bin event-registration-server
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod metrics;
pub mod server;

pub use bootstrap::build_state;
pub use config::Config;
pub use server::{AppState, build_router};
