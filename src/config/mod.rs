//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `RSVP_HUB` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use rsvp_hub::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod membership;
mod redis;
mod seed;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use membership::MembershipConfig;
pub use redis::RedisConfig;
pub use seed::{load_seed_events, parse_seed_events, SeedEvent};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL event store. In-memory store when absent.
    pub database: Option<DatabaseConfig>,

    /// Cross-node relay. Single-node fan-out when absent.
    pub redis: Option<RedisConfig>,

    pub auth: AuthConfig,

    #[serde(default)]
    pub membership: MembershipConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// - `RSVP_HUB__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `RSVP_HUB__AUTH__JWT_SECRET=...` -> `auth.jwt_secret = ...`
    ///
    /// A `.env` file is read first when present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or a value
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("RSVP_HUB")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        if let Some(redis) = &self.redis {
            redis.validate()?;
        }
        self.auth.validate(&self.server.environment)?;
        self.membership.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
