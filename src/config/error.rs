//! Startup configuration failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sources could not be read or deserialized.
    #[error("could not load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// A loaded value the service refuses to start with.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must be set")]
    MissingRequired(&'static str),

    #[error("server port must be non-zero")]
    InvalidPort,

    #[error("request timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("event queue capacity must be non-zero")]
    InvalidEventQueueCapacity,

    #[error("cannot bind to {0}")]
    InvalidBindAddress(String),

    #[error("database url must use the postgres scheme")]
    InvalidDatabaseUrl,

    #[error("database min_connections is above max_connections")]
    InvalidPoolSize,

    #[error("database max_connections is capped at 100")]
    PoolSizeTooLarge,

    #[error("token signing secret needs at least {0} bytes")]
    JwtSecretTooShort(usize),

    #[error("booking timezone offset is outside +/-18h")]
    InvalidTimezoneOffset,
}
