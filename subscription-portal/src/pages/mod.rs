//! Page view-models.
//!
//! Each page fetches what it needs when mounted, keeps that in local state,
//! and renders itself through [`std::fmt::Display`]. Pages never propagate API
//! failures; they turn them into the single message the page shows. Errors
//! returned from page methods mean the action itself was not possible (a
//! missing required field, an action the page does not offer) and no request
//! was sent.

pub mod my_subscriptions;
pub mod payment;
pub mod plans;
pub mod status;
pub mod subscribe;

#[cfg(test)]
mod tests;

pub use my_subscriptions::MySubscriptionsPage;
pub use payment::{PaymentFailure, PaymentPage, PaymentState};
pub use plans::{PlanGroups, PlansPage};
pub use status::{ActionOutcome, StatusAction, StatusPage};
pub use subscribe::SubscribePage;

use crate::error::{PortalError, Result};

/// Fetch state of a page's primary data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    /// The request is in flight.
    Loading,
    /// The request failed; holds the message to display.
    Failed(String),
    /// The data arrived.
    Ready(T),
}

impl<T> LoadState<T> {
    /// Returns the loaded value, if any.
    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Returns `true` while the request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Blocking user prompts.
///
/// Stands in for the browser's `confirm()` and `alert()`.
pub trait Dialog {
    /// Asks a yes/no question and blocks until answered.
    fn confirm(&self, message: &str) -> bool;

    /// Shows a message and blocks until acknowledged.
    fn alert(&self, message: &str);
}

impl<D: Dialog + ?Sized> Dialog for &D {
    fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message)
    }

    fn alert(&self, message: &str) {
        (**self).alert(message);
    }
}

/// Checks a required free-text field.
pub(crate) fn require(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PortalError::InvalidInput(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

/// Checks a required email field has the `local@domain` shape.
pub(crate) fn require_email(value: &str) -> Result<String> {
    let email = require("email", value)?;
    let well_formed = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.is_empty()
            && !domain.contains('@')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !email.chars().any(char::is_whitespace)
    });
    if !well_formed {
        return Err(PortalError::InvalidInput(format!("'{email}' is not a valid email address")));
    }
    Ok(email)
}
