//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Realtime URL must use ws:// or wss://")]
    InvalidRealtimeUrl,

    #[error("Realtime URL must use wss:// in production")]
    RealtimeUrlMustBeSecure,

    #[error("Error close grace must be between 1 and 60000 ms")]
    InvalidErrorGrace,

    #[error("Invalid log filter '{0}'")]
    InvalidLogFilter(String),
}
