//! Configuration management for the registration service.
//!
//! Loads configuration from environment variables with sensible defaults.
//! A `.env` file, when present, is read by the binary before this runs.

use event_registration_core::{ConcurrencyMode, RegistrationSettings};
use event_registration_postgres::PoolSettings;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Invalid configuration value.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable holds a value outside its allowed set
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name
        key: &'static str,
        /// Offending value
        value: String,
    },
    /// A variable required by the chosen setup is missing
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Storage backend selection
    pub storage: StorageBackend,
    /// `PostgreSQL` configuration (used when `storage` is `Postgres`)
    pub database: DatabaseConfig,
    /// Engine behaviour switches
    pub registration: RegistrationConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Prometheus exporter port (0 disables the exporter)
    pub metrics_port: u16,
    /// Allowed CORS origins (`*` allows any)
    pub cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// `host:port` for the HTTP listener.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where events, users and registrations live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Process-local maps, lost on restart
    #[default]
    Memory,
    /// `PostgreSQL` through sqlx
    Postgres,
}

/// `PostgreSQL` configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL
    pub url: Option<String>,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections in the pool
    pub min_connections: u32,
    /// Acquire timeout in seconds
    pub acquire_timeout: u64,
    /// Apply embedded migrations on startup
    pub run_migrations: bool,
}

impl DatabaseConfig {
    /// Pool sizing for [`event_registration_postgres::PostgresStorage::connect`].
    #[must_use]
    pub const fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout),
        }
    }
}

/// Registration engine switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistrationConfig {
    /// Run register/unregister one at a time per event
    pub serialize_per_event: bool,
    /// Close waitlist gaps when a waitlisted user withdraws
    pub compact_waitlist: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `STORAGE_BACKEND` is unknown, or if it is
    /// `postgres` and `DATABASE_URL` is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Numeric values that fail to parse fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str, default: bool| lookup(key).map_or(default, |s| parse_bool(&s));

        let storage = match lookup("STORAGE_BACKEND") {
            None => StorageBackend::default(),
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "memory" => StorageBackend::Memory,
                "postgres" | "postgresql" => StorageBackend::Postgres,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "STORAGE_BACKEND",
                        value,
                    });
                }
            },
        };

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            max_connections: parsed(&lookup, "DATABASE_MAX_CONNECTIONS").unwrap_or(10),
            min_connections: parsed(&lookup, "DATABASE_MIN_CONNECTIONS").unwrap_or(1),
            acquire_timeout: parsed(&lookup, "DATABASE_ACQUIRE_TIMEOUT").unwrap_or(30),
            run_migrations: flag("DATABASE_RUN_MIGRATIONS", true),
        };
        if storage == StorageBackend::Postgres && database.url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        Ok(Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parsed(&lookup, "PORT").unwrap_or(8080),
                metrics_port: parsed(&lookup, "METRICS_PORT").unwrap_or(9090),
                cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map_or_else(|| vec!["*".to_string()], |s| split_list(&s)),
            },
            storage,
            database,
            registration: RegistrationConfig {
                serialize_per_event: flag("REGISTRATION_SERIALIZE_PER_EVENT", false),
                compact_waitlist: flag("REGISTRATION_COMPACT_WAITLIST", false),
            },
        })
    }

    /// Engine settings derived from the registration switches.
    #[must_use]
    pub const fn settings(&self) -> RegistrationSettings {
        RegistrationSettings {
            concurrency: if self.registration.serialize_per_event {
                ConcurrencyMode::SerializedPerEvent
            } else {
                ConcurrencyMode::Optimistic
            },
            compact_waitlist_on_withdrawal: self.registration.compact_waitlist,
        }
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|s| s.trim().parse().ok())
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.server.address(), "0.0.0.0:8080");
        assert_eq!(config.server.metrics_port, 9090);
        assert_eq!(config.server.cors_allowed_origins, vec!["*".to_string()]);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.database.pool_settings(), PoolSettings::default());
        assert!(config.database.run_migrations);
        assert_eq!(config.settings(), RegistrationSettings::default());
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("METRICS_PORT", "0"),
            ("STORAGE_BACKEND", "Postgres"),
            ("DATABASE_URL", "postgres://localhost/events"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("DATABASE_RUN_MIGRATIONS", "false"),
            ("REGISTRATION_SERIALIZE_PER_EVENT", "true"),
            ("REGISTRATION_COMPACT_WAITLIST", "1"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
        ])
        .unwrap();

        assert_eq!(config.server.address(), "127.0.0.1:3000");
        assert_eq!(config.server.metrics_port, 0);
        assert_eq!(
            config.server.cors_allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.database.max_connections, 4);
        assert!(!config.database.run_migrations);

        let settings = config.settings();
        assert_eq!(settings.concurrency, ConcurrencyMode::SerializedPerEvent);
        assert!(settings.compact_waitlist_on_withdrawal);
    }

    #[test]
    fn unparsable_numbers_fall_back_to_defaults() {
        let config = load(&[("PORT", "eighty"), ("DATABASE_ACQUIRE_TIMEOUT", "-1")]).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.acquire_timeout, 30);
    }

    #[test]
    fn invalid_backend_and_missing_url_are_rejected() {
        assert_eq!(
            load(&[("STORAGE_BACKEND", "dynamo")]).unwrap_err(),
            ConfigError::InvalidValue {
                key: "STORAGE_BACKEND",
                value: "dynamo".to_string(),
            }
        );
        assert_eq!(
            load(&[("STORAGE_BACKEND", "postgres")]).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
    }
}
