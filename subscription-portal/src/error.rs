//! Error types for the subscription portal.
//!
//! This module defines every error that can occur while talking to the
//! subscription API or driving the portal pages. All errors implement
//! [`std::error::Error`] via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Network Errors** ([`PortalError::HttpError`]): transport failures
//! - **API Errors** ([`PortalError::ApiError`]): the API answered with a non-2xx status
//! - **Protocol Errors** ([`PortalError::InvalidResponse`]): the body did not match the
//!   expected shape
//! - **Input Errors** ([`PortalError::InvalidRoute`], [`PortalError::InvalidInput`],
//!   [`PortalError::InvalidApiUrl`], [`PortalError::ConfigError`])
//!
//! Pages never surface these errors directly. They collapse them into a single
//! display message, using [`PortalError::api_body`] when the server sent one.
//!
//! # Examples
//!
//! ```
//! use subscription_portal::error::{PortalError, Result};
//!
//! fn require_email(email: &str) -> Result<&str> {
//!     if email.trim().is_empty() {
//!         return Err(PortalError::InvalidInput("email is required".to_owned()));
//!     }
//!     Ok(email)
//! }
//!
//! assert!(require_email("").is_err());
//! ```

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for portal operations.
pub type Result<T> = std::result::Result<T, PortalError>;

/// JSON error body returned by the subscription API.
///
/// Regular failures only carry `error`. Payment failures carry the
/// structured `message`, `error_code`, `error_reason` and `transaction_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    /// Short error text (`{"error": "Plan not found"}`).
    #[serde(default)]
    pub error: Option<String>,
    /// Human readable message, present on payment failures.
    #[serde(default)]
    pub message: Option<String>,
    /// Machine readable error code (e.g. `card_declined`).
    #[serde(default)]
    pub error_code: Option<String>,
    /// Machine readable reason (e.g. `expired_card`).
    #[serde(default)]
    pub error_reason: Option<String>,
    /// Transaction identifier, when the API recorded one.
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Errors that can occur in the subscription portal.
///
/// # Error Recovery
///
/// None of these are retried automatically. Every failure is terminal for the
/// current interaction; the user re-submits or re-navigates to try again.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum PortalError {
    /// HTTP request failed before a response was received.
    ///
    /// Wraps [`reqwest::Error`]: connection refused, DNS failure, TLS errors,
    /// or a configured timeout elapsing.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The API answered with a non-success status code.
    ///
    /// `body` is `None` when the response was not a JSON object.
    #[error("API returned status {status}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Parsed error body, if any.
        body: Option<ApiErrorBody>,
    },

    /// The API answered 2xx but the body did not have the expected shape.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// The configured API base URL cannot be used.
    ///
    /// # Examples
    ///
    /// ```
    /// use subscription_portal::error::PortalError;
    ///
    /// let err = PortalError::InvalidApiUrl("ftp://example.com".to_owned());
    /// assert!(err.to_string().contains("Invalid API URL"));
    /// ```
    #[error("Invalid API URL: {0}")]
    InvalidApiUrl(String),

    /// A path does not match any client route.
    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    /// User input failed a required-field check or could not be parsed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl PortalError {
    /// Returns the server error body, if this error carries one.
    #[must_use]
    pub fn api_body(&self) -> Option<&ApiErrorBody> {
        match self {
            Self::ApiError { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Returns the server `error` text, if any.
    ///
    /// This is the text the subscribe form and the status page actions show
    /// in place of their hardcoded fallbacks.
    #[must_use]
    pub fn server_error(&self) -> Option<&str> {
        self.api_body().and_then(|body| body.error.as_deref())
    }

    /// Returns the HTTP status for API errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
