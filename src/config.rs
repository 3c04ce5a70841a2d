//! Client configuration.
//!
//! Holds the audio service location and request timeout. Values come from
//! defaults, the environment, or explicit overrides from the CLI.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SoundEditError};

/// Environment variable holding the service base URL.
pub const API_URL_ENV: &str = "SOUNDEDIT_API_URL";
/// Environment variable holding the request timeout in milliseconds.
pub const TIMEOUT_ENV: &str = "SOUNDEDIT_TIMEOUT_MS";

/// Default service location.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Default request timeout (5 minutes; conversions and uploads are slow).
pub const DEFAULT_TIMEOUT_MS: u64 = 300_000;

/// Connection settings for the audio service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the service, e.g. `http://localhost:8000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration from `SOUNDEDIT_API_URL` / `SOUNDEDIT_TIMEOUT_MS`.
    ///
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let base_url = env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let timeout_ms = env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self {
            base_url,
            timeout_ms,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Check that the configuration can be used to reach a service.
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(SoundEditError::InvalidConfig {
                reason: "base URL is empty".to_string(),
            });
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SoundEditError::InvalidConfig {
                reason: format!("base URL must start with http:// or https://, got '{}'", url),
            });
        }
        if self.timeout_ms == 0 {
            return Err(SoundEditError::InvalidConfig {
                reason: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Join a service path onto the base URL.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}
