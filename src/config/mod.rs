//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `SKILL_EXCHANGE`
//! prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use skill_exchange::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod booking;
mod database;
mod error;
mod server;

pub use auth::AuthConfig;
pub use booking::BookingConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, logging, timeouts)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Bearer token verification
    pub auth: AuthConfig,

    /// Cancellation day boundary
    #[serde(default)]
    pub booking: BookingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` when present, then reads `SKILL_EXCHANGE__*` variables:
    ///
    /// - `SKILL_EXCHANGE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SKILL_EXCHANGE__DATABASE__URL=...` -> `database.url = ...`
    /// - `SKILL_EXCHANGE__AUTH__JWT_SECRET=...` -> `auth.jwt_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SKILL_EXCHANGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first section that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.booking.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 6] = [
        "SKILL_EXCHANGE__DATABASE__URL",
        "SKILL_EXCHANGE__AUTH__JWT_SECRET",
        "SKILL_EXCHANGE__SERVER__PORT",
        "SKILL_EXCHANGE__SERVER__ENVIRONMENT",
        "SKILL_EXCHANGE__SERVER__LOG_FORMAT",
        "SKILL_EXCHANGE__BOOKING__TIMEZONE_OFFSET_MINUTES",
    ];

    fn set_minimal_env() {
        env::set_var(
            "SKILL_EXCHANGE__DATABASE__URL",
            "postgresql://test@localhost/test",
        );
        env::set_var("SKILL_EXCHANGE__AUTH__JWT_SECRET", "local-dev-secret");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let config = load_with(&[]).unwrap();

        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.auth.issuer, "skill-exchange");
        assert_eq!(config.booking.timezone_offset_minutes, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let config = load_with(&[]).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_overrides() {
        let config = load_with(&[
            ("SKILL_EXCHANGE__SERVER__PORT", "3000"),
            ("SKILL_EXCHANGE__SERVER__LOG_FORMAT", "json"),
            ("SKILL_EXCHANGE__BOOKING__TIMEZONE_OFFSET_MINUTES", "-300"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.booking.timezone_offset_minutes, -300);
    }

    #[test]
    fn test_production_requires_long_secret() {
        let config = load_with(&[("SKILL_EXCHANGE__SERVER__ENVIRONMENT", "production")]).unwrap();

        assert!(config.is_production());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::JwtSecretTooShort(_))
        ));
    }

    #[test]
    fn test_missing_database_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("SKILL_EXCHANGE__AUTH__JWT_SECRET", "local-dev-secret");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }
}
