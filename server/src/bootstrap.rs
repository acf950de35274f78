//! Wiring the configured storage backend into the application state.

use crate::config::{Config, ConfigError, StorageBackend};
use crate::server::AppState;
use event_registration_core::{Clock, InMemoryStorage, RegistrationEnvironment, SystemClock};
use event_registration_postgres::PostgresStorage;
use std::sync::Arc;

/// Open the configured backend and build the state shared by all handlers.
///
/// For `PostgreSQL`, embedded migrations run first when
/// `DATABASE_RUN_MIGRATIONS` is on.
///
/// # Errors
///
/// Returns error if the database cannot be reached or a migration fails.
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let env = match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data will not survive a restart");
            RegistrationEnvironment::from_storage(clock, Arc::new(InMemoryStorage::new()))
        }
        StorageBackend::Postgres => {
            let url = config
                .database
                .url
                .as_deref()
                .ok_or(ConfigError::Missing("DATABASE_URL"))?;
            let storage = PostgresStorage::connect(url, config.database.pool_settings()).await?;
            if config.database.run_migrations {
                storage.migrate().await?;
            }
            RegistrationEnvironment::from_storage(clock, Arc::new(storage))
        }
    };

    let settings = config.settings();
    tracing::info!(
        storage = ?config.storage,
        concurrency = ?settings.concurrency,
        compact_waitlist = settings.compact_waitlist_on_withdrawal,
        "Application state initialized"
    );
    Ok(AppState::new(env, settings))
}
