//! Real-time channel configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::Environment;

/// Endpoint the event channel connects to when nothing is configured.
pub const DEFAULT_REALTIME_URL: &str = "ws://localhost:8080/ws";

/// Real-time event channel configuration
///
/// The reconnect schedule (5 attempts, 1s doubling) is fixed and not
/// configurable; see [`crate::domain::realtime::Backoff`].
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    /// WebSocket endpoint URL
    #[serde(default = "default_url")]
    pub url: String,

    /// How long to wait for a close after a transport error, in milliseconds
    #[serde(default = "default_error_close_grace")]
    pub error_close_grace_ms: u64,
}

impl RealtimeConfig {
    /// Config pointing at `url` with default timings
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Get the error grace period as Duration
    pub fn error_close_grace(&self) -> Duration {
        Duration::from_millis(self.error_close_grace_ms)
    }

    /// Validate realtime configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("REALTIME_URL"));
        }
        let secure = self.url.starts_with("wss://");
        if !secure && !self.url.starts_with("ws://") {
            return Err(ValidationError::InvalidRealtimeUrl);
        }
        if *environment == Environment::Production && !secure {
            return Err(ValidationError::RealtimeUrlMustBeSecure);
        }
        if self.error_close_grace_ms == 0 || self.error_close_grace_ms > 60_000 {
            return Err(ValidationError::InvalidErrorGrace);
        }
        Ok(())
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            error_close_grace_ms: default_error_close_grace(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_REALTIME_URL.to_string()
}

fn default_error_close_grace() -> u64 {
    5_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtime_config_defaults() {
        let config = RealtimeConfig::default();
        assert_eq!(config.url, "ws://localhost:8080/ws");
        assert_eq!(config.error_close_grace(), Duration::from_secs(5));
    }

    #[test]
    fn test_validation_missing_url() {
        let config = RealtimeConfig::with_url("");
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("REALTIME_URL"))
        );
    }

    #[test]
    fn test_validation_rejects_http_scheme() {
        let config = RealtimeConfig::with_url("http://localhost:8080/ws");
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidRealtimeUrl)
        );
    }

    #[test]
    fn test_validation_requires_wss_in_production() {
        let config = RealtimeConfig::with_url("ws://events.example.com/ws");
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::RealtimeUrlMustBeSecure)
        );

        let config = RealtimeConfig::with_url("wss://events.example.com/ws");
        assert!(config.validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_validation_invalid_grace() {
        let config = RealtimeConfig {
            error_close_grace_ms: 0,
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_err());

        let config = RealtimeConfig {
            error_close_grace_ms: 120_000,
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_err());
    }
}
