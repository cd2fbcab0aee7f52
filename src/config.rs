//! Configuration for the Flurry reporting client.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Public endpoint of the Flurry reporting service.
const DEFAULT_BASE_URL: &str = "http://api.flurry.com";

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Account-level API access code (one per Flurry account).
    #[serde(default)]
    pub api_access_code: String,

    /// Application API key (one per application).
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the reporting service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Minimum spacing between requests in milliseconds. The service
    /// throttles at roughly one request per second; `0` disables pacing.
    #[serde(default = "default_request_interval")]
    pub request_interval_ms: u64,

    /// Enable debug logging of outgoing requests.
    #[serde(default)]
    pub debug: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_request_interval() -> u64 {
    1000
}

impl Config {
    /// A configuration with the given credentials and every other field at
    /// its default.
    pub fn new(api_access_code: impl Into<String>, api_key: impl Into<String>) -> Self {
        Config {
            api_access_code: api_access_code.into(),
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            request_interval_ms: default_request_interval(),
            debug: false,
        }
    }

    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.api_access_code.is_empty() {
            return Err(ConfigError::MissingField("api_access_code".into()));
        }
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingField("api_key".into()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "base_url '{}' must start with http:// or https://",
                self.base_url
            )));
        }
        Ok(())
    }

    /// The base URL without any trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Get timeout as Duration.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }

    /// Get the request spacing as Duration.
    pub fn request_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_interval_ms)
    }
}
