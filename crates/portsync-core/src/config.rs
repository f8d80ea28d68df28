//! Dashboard connection configuration.

use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Default Dashboard API v0 base URL.
pub const DEFAULT_BASE_URL: &str = "https://dashboard.meraki.com/api/v0";

/// Configuration for a Dashboard client instance.
///
/// The API key is held as a [`SecretString`] so it never leaks through
/// `Debug` output or argument echoes.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DashboardConfig {
    /// Dashboard API base URL
    #[validate(url)]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as `X-Cisco-Meraki-API-Key`
    pub api_key: SecretString,

    /// Organization the run is scoped to
    #[validate(length(min = 1))]
    pub org_id: String,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Per-request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum retry attempts for idempotent reads
    #[validate(range(min = 0, max = 10))]
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    3
}

impl DashboardConfig {
    /// Create a configuration for the given credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the API key or organization
    /// id is empty, or if validation fails.
    pub fn new(api_key: impl Into<String>, org_id: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            base_url: default_base_url(),
            api_key: SecretString::from(api_key.into()),
            org_id: org_id.into(),
            tls_verify: default_tls_verify(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
        };

        config.check()?;
        Ok(config)
    }

    /// Override the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the URL is invalid.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, Error> {
        self.base_url = base_url.into();
        self.check()?;
        Ok(self)
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set the per-request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set the maximum retry attempts for reads.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Get the per-request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse and validate the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the URL cannot be parsed.
    pub fn parse_base_url(&self) -> Result<Url, Error> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::ConfigError(format!("Invalid base URL: {e}")))
    }

    fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        if self.api_key.expose_secret().is_empty() {
            return Err(Error::ConfigError("API key must not be empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = DashboardConfig::new("key-123", "987654").unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.org_id, "987654");
        assert!(config.tls_verify);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_config_rejects_empty_api_key() {
        let result = DashboardConfig::new("", "987654");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_config_rejects_empty_org_id() {
        let result = DashboardConfig::new("key-123", "");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_config_rejects_invalid_base_url() {
        let result = DashboardConfig::new("key-123", "987654")
            .unwrap()
            .with_base_url("not-a-url");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_config_builder() {
        let config = DashboardConfig::new("key-123", "987654")
            .unwrap()
            .with_base_url("http://localhost:8080/api/v0")
            .unwrap()
            .with_tls_verify(false)
            .with_timeout(45)
            .with_max_retries(0);

        assert_eq!(config.base_url, "http://localhost:8080/api/v0");
        assert!(!config.tls_verify);
        assert_eq!(config.timeout(), Duration::from_secs(45));
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_config_parse_base_url() {
        let config = DashboardConfig::new("key-123", "987654").unwrap();
        let url = config.parse_base_url().unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("dashboard.meraki.com"));
    }

    #[test]
    fn test_api_key_redacted_in_debug() {
        let config = DashboardConfig::new("key-123", "987654").unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("key-123"));
    }

    #[test]
    fn test_config_deserialization_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{"api_key": "key-123", "org_id": "987654"}"#).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_retries, 3);
        assert!(config.tls_verify);
    }
}
