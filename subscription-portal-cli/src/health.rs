//! `health` subcommand: configuration and API reachability checks.

use subscription_portal::{HttpApi, PortalConfig, SubscriptionApi, models::ApiHealth};
use tracing::{info, warn};

/// Overall health of the portal's environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Every check passed.
    Healthy,
    /// Usable, but something looks off.
    Degraded,
    /// At least one check failed.
    Unhealthy,
}

impl HealthStatus {
    /// Returns the JSON name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        }
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthCheckStatus {
    /// Check passed.
    Pass,
    /// Check passed with a caveat.
    Warn,
    /// Check failed.
    Fail,
}

impl HealthCheckStatus {
    /// Returns the JSON name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warn => "warn",
            Self::Fail => "fail",
        }
    }
}

/// A named check result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheck {
    /// Check name.
    pub name: &'static str,
    /// Check outcome.
    pub status: HealthCheckStatus,
    /// Detail text.
    pub message: String,
}

impl HealthCheck {
    fn new(name: &'static str, status: HealthCheckStatus, message: impl Into<String>) -> Self {
        Self {
            name,
            status,
            message: message.into(),
        }
    }
}

/// Report printed by `subscription-portal health`.
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Overall status.
    pub status: HealthStatus,
    /// CLI version.
    pub version: &'static str,
    /// API base URL that was checked.
    pub api_url: String,
    /// Individual checks.
    pub checks: Vec<HealthCheck>,
}

impl HealthReport {
    /// Runs every check against `config`.
    ///
    /// The API is only contacted when the configuration is valid.
    pub async fn collect(config: &PortalConfig) -> Self {
        let mut checks = vec![check_config(config)];
        if checks[0].status == HealthCheckStatus::Pass {
            checks.push(match HttpApi::with_config(&config.api) {
                Ok(api) => check_api(&api).await,
                Err(e) => HealthCheck::new("api", HealthCheckStatus::Fail, e.to_string()),
            });
        }

        let status = Self::compute_status(&checks);
        info!(status = status.as_str(), "health checks finished");
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            api_url: config.api.base_url.clone(),
            checks,
        }
    }

    /// Worst status across checks; no checks means healthy.
    #[must_use]
    pub fn compute_status(checks: &[HealthCheck]) -> HealthStatus {
        if checks.iter().any(|c| c.status == HealthCheckStatus::Fail) {
            HealthStatus::Unhealthy
        } else if checks.iter().any(|c| c.status == HealthCheckStatus::Warn) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }

    /// Serializes the report as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns error if JSON serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::json!({
            "status": self.status.as_str(),
            "version": self.version,
            "api_url": self.api_url,
            "checks": self.checks.iter().map(|c| serde_json::json!({
                "name": c.name,
                "status": c.status.as_str(),
                "message": c.message,
            })).collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&json)
    }
}

fn check_config(config: &PortalConfig) -> HealthCheck {
    match config.validate() {
        Ok(()) => HealthCheck::new("config", HealthCheckStatus::Pass, "configuration valid"),
        Err(e) => HealthCheck::new("config", HealthCheckStatus::Fail, e.to_string()),
    }
}

async fn check_api<A: SubscriptionApi>(api: &A) -> HealthCheck {
    match api.health().await {
        Ok(ApiHealth { status, message }) if status == "healthy" => HealthCheck::new(
            "api",
            HealthCheckStatus::Pass,
            message.unwrap_or_else(|| "API is healthy".to_owned()),
        ),
        Ok(health) => {
            warn!(status = %health.status, "API reported a non-healthy status");
            HealthCheck::new(
                "api",
                HealthCheckStatus::Warn,
                format!("API reported status '{}'", health.status),
            )
        }
        Err(e) => {
            warn!(error = %e, "API health check failed");
            HealthCheck::new("api", HealthCheckStatus::Fail, e.to_string())
        }
    }
}
