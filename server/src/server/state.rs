//! Application state for the registration HTTP server.
//!
//! Contains all shared resources needed by HTTP handlers:
//! - Registration engine (register / unregister with promotion)
//! - Catalog (event and user CRUD)
//! - Projections (joined read views)

use event_registration_core::{
    Catalog, Projections, RegistrationEngine, RegistrationEnvironment, RegistrationSettings,
    StorageError, storage::EventRepository,
};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Registration and unregistration with capacity enforcement
    pub engine: Arc<RegistrationEngine>,

    /// Event and user CRUD
    pub catalog: Catalog,

    /// Joined registration views
    pub projections: Projections,

    /// Events collection, pinged by the readiness check
    events: Arc<dyn EventRepository>,
}

impl AppState {
    /// Create a new application state over one environment.
    #[must_use]
    pub fn new(env: RegistrationEnvironment, settings: RegistrationSettings) -> Self {
        Self {
            events: Arc::clone(&env.events),
            catalog: Catalog::new(env.clone()),
            projections: Projections::new(env.clone()),
            engine: Arc::new(RegistrationEngine::new(env, settings)),
        }
    }

    /// Check that the storage backend answers.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if it is unreachable.
    pub async fn ping_storage(&self) -> Result<(), StorageError> {
        self.events.ping().await
    }
}
