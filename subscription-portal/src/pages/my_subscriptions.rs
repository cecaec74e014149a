//! User subscription lookup page (`/my-subscriptions`).

use std::fmt;

use tracing::{info, warn};

use super::require_email;
use crate::{
    api::SubscriptionApi,
    error::{PortalError, Result},
    models::{SubscriptionId, SubscriptionSummary, UserId},
    router::{Navigation, Route},
    view,
};

/// Shown when either lookup fails.
pub const LOOKUP_FAILED: &str = "User not found or no subscriptions";

/// Email lookup of a user's subscriptions.
#[derive(Debug, Clone, Default)]
pub struct MySubscriptionsPage {
    email: String,
    user_id: Option<UserId>,
    subscriptions: Vec<SubscriptionSummary>,
    loading: bool,
    error: Option<String>,
}

impl MySubscriptionsPage {
    /// Mounts an empty lookup form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current email field value.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// User resolved by the last successful lookup.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Subscriptions found by the last lookup.
    #[must_use]
    pub fn subscriptions(&self) -> &[SubscriptionSummary] {
        &self.subscriptions
    }

    /// Error from the last lookup, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sets the "Email Address" field.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Looks up the user by email, then lists their subscriptions.
    ///
    /// The second request is only sent after the first resolves. Any failure
    /// clears the user and the list and shows one generic message.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidInput`] if the email field is empty or
    /// malformed; no request is sent.
    pub async fn search<A: SubscriptionApi>(&mut self, api: &A) -> Result<()> {
        if self.loading {
            return Ok(());
        }
        let email = require_email(&self.email)?;

        self.loading = true;
        self.error = None;
        let result = Self::lookup(api, &email).await;
        self.loading = false;

        match result {
            Ok((user_id, subscriptions)) => {
                info!(%user_id, count = subscriptions.len(), "user subscriptions loaded");
                self.user_id = Some(user_id);
                self.subscriptions = subscriptions;
            }
            Err(e) => {
                warn!(error = %e, "subscription lookup failed");
                self.error = Some(LOOKUP_FAILED.to_owned());
                self.user_id = None;
                self.subscriptions.clear();
            }
        }
        Ok(())
    }

    async fn lookup<A: SubscriptionApi>(
        api: &A,
        email: &str,
    ) -> Result<(UserId, Vec<SubscriptionSummary>)> {
        let user = api.find_user_by_email(email).await?;
        let subscriptions = api.list_user_subscriptions(user.id).await?;
        Ok((user.id, subscriptions))
    }

    /// "View Details" on a listed subscription.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidInput`] if the subscription is not listed.
    pub fn view(&self, id: SubscriptionId) -> Result<Navigation> {
        self.subscriptions
            .iter()
            .find(|s| s.id == id)
            .map(|s| Navigation::to(Route::Status(s.id)))
            .ok_or_else(|| PortalError::InvalidInput(format!("subscription {id} is not listed")))
    }
}

impl fmt::Display for MySubscriptionsPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "My Subscriptions")?;
        writeln!(f)?;
        writeln!(f, "View Your Subscriptions")?;
        view::field(f, "Email Address", &self.email)?;
        if self.loading {
            writeln!(f, "[Loading...]")?;
        } else {
            writeln!(f, "[View Subscriptions] search")?;
        }

        if let Some(error) = &self.error {
            view::error_alert(f, error)?;
        }

        if !self.subscriptions.is_empty() {
            writeln!(f)?;
            writeln!(f, "Your Subscriptions")?;
            for sub in &self.subscriptions {
                writeln!(
                    f,
                    "#{} {} {}",
                    sub.id,
                    sub.plan_name,
                    view::badge(&sub.status)
                )?;
                view::field(
                    f,
                    "  Price",
                    view::price_per_cycle(sub.price, &sub.billing_cycle),
                )?;
                view::field(f, "  Status", &sub.status)?;
                let next = sub
                    .next_billing_date
                    .as_ref()
                    .map_or_else(|| "N/A".to_owned(), |date| date.date_display());
                view::field(f, "  Next Billing", next)?;
                writeln!(f, "  [View Details] view {}", sub.id)?;
            }
        }
        Ok(())
    }
}
