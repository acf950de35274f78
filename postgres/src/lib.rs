//! `PostgreSQL` storage backend for the event registration service.
//!
//! This crate implements the three storage traits from
//! `event-registration-core` on top of a sqlx connection pool:
//!
//! - Events with an atomically adjusted `registered_count`
//! - Users with conditional insert
//! - Registrations keyed by `(user_id, event_id)` with lookups by event and by user
//!
//! Every trait method is a single SQL statement, so each call is atomic on its
//! own and nothing spans more than one row.
//!
//! # Example
//!
//! ```no_run
//! use event_registration_postgres::{PoolSettings, PostgresStorage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = PostgresStorage::connect("postgres://localhost/events", PoolSettings::default()).await?;
//! storage.migrate().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod events;
mod registrations;
mod rows;
mod users;

use event_registration_core::error::StorageError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// Connection pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// Upper bound on open connections
    pub max_connections: u32,
    /// Connections kept open while idle
    pub min_connections: u32,
    /// How long to wait for a free connection
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// `PostgreSQL`-backed events, users and registrations.
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the connection fails.
    pub async fn connect(database_url: &str, settings: PoolSettings) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(database_url)
            .await
            .map_err(|e| StorageError::backend(format!("Failed to connect: {e}")))?;

        tracing::info!(
            max_connections = settings.max_connections,
            min_connections = settings.min_connections,
            "Connected to PostgreSQL"
        );
        Ok(Self::from_pool(pool))
    }

    /// Create the `events`, `users` and `registrations` tables if missing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::backend(format!("Migration failed: {e}")))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

#[allow(clippy::needless_pass_by_value)] // used as `map_err(db_error)`
fn db_error(e: sqlx::Error) -> StorageError {
    StorageError::backend(e.to_string())
}

fn to_db_int(field: &str, value: u32) -> Result<i32, StorageError> {
    i32::try_from(value).map_err(|_| StorageError::backend(format!("{field} {value} is out of range")))
}
