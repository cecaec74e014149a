//! Portal configuration.
//!
//! Configuration is read from TOML, then optionally overridden from the
//! environment and the command line.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:5000/api"
//! timeout_secs = 30
//!
//! [payment]
//! redirect_delay_ms = 2500
//! ```

use std::{path::Path, time::Duration};

use serde::Deserialize;
use url::Url;

use crate::error::{PortalError, Result};

/// Environment variable that overrides [`ApiConfig::base_url`].
pub const API_URL_ENV: &str = "SUBSCRIPTION_API_URL";

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Root portal configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PortalConfig {
    /// Subscription API connection settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Payment page behavior.
    #[serde(default)]
    pub payment: PaymentConfig,
}

impl PortalConfig {
    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::ConfigError`] on malformed TOML or unknown field types.
    ///
    /// # Examples
    ///
    /// ```
    /// use subscription_portal::config::PortalConfig;
    ///
    /// let config = PortalConfig::from_toml("[payment]\nredirect_delay_ms = 100").unwrap();
    /// assert_eq!(config.payment.redirect_delay_ms, 100);
    /// assert_eq!(config.api.base_url, "http://localhost:5000/api");
    /// ```
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PortalError::ConfigError(e.to_string()))
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PortalError::ConfigError(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Applies the `SUBSCRIPTION_API_URL` environment override.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_api_url(std::env::var(API_URL_ENV).ok())
    }

    /// Replaces the base URL when `url` is set and non-empty.
    #[must_use]
    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        self
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidApiUrl`] or [`PortalError::ConfigError`].
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.payment.validate()
    }
}

/// Subscription API connection settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds; unset leaves the client default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Connection timeout in seconds; unset leaves the client default.
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,

    /// Maximum idle connections per host.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            connect_timeout_secs: None,
            pool_max_idle_per_host: default_pool_max_idle(),
        }
    }
}

impl ApiConfig {
    /// Validates the base URL and timeout bounds.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `base_url` is not an absolute `http`/`https` URL
    /// - `timeout_secs` is outside 1-300 seconds
    /// - `connect_timeout_secs` is outside 1-60 seconds
    pub fn validate(&self) -> Result<()> {
        self.parsed_base_url()?;
        if let Some(secs) = self.timeout_secs
            && !(1..=300).contains(&secs)
        {
            return Err(PortalError::ConfigError(
                "timeout_secs must be between 1 and 300".to_owned(),
            ));
        }
        if let Some(secs) = self.connect_timeout_secs
            && !(1..=60).contains(&secs)
        {
            return Err(PortalError::ConfigError(
                "connect_timeout_secs must be between 1 and 60".to_owned(),
            ));
        }
        Ok(())
    }

    /// Parses the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidApiUrl`] if the URL does not parse, is not
    /// http(s), or cannot carry path segments.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim()).map_err(|e| {
            PortalError::InvalidApiUrl(format!("'{}': {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PortalError::InvalidApiUrl(format!(
                "scheme must be http or https, got: {}",
                url.scheme()
            )));
        }
        if url.cannot_be_a_base() {
            return Err(PortalError::InvalidApiUrl(format!("'{}' cannot be a base", self.base_url)));
        }
        Ok(url)
    }

    /// Returns the request timeout, if configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Returns the connect timeout, if configured.
    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }
}

/// Payment page behavior.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PaymentConfig {
    /// Delay before redirecting to the status page after a successful payment.
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            redirect_delay_ms: default_redirect_delay_ms(),
        }
    }
}

impl PaymentConfig {
    /// Validates the redirect delay (at most one minute).
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::ConfigError`] if the delay exceeds 60000 ms.
    pub fn validate(&self) -> Result<()> {
        if self.redirect_delay_ms > 60_000 {
            return Err(PortalError::ConfigError(
                "redirect_delay_ms must be at most 60000".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns the redirect delay as Duration.
    #[must_use]
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_owned()
}

fn default_pool_max_idle() -> usize {
    100
}

fn default_redirect_delay_ms() -> u64 {
    2500
}
