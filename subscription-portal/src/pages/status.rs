//! Subscription status page (`/subscription/:subscriptionId`).

use std::fmt;

use tracing::{info, warn};

use super::{Dialog, LoadState};
use crate::{
    api::SubscriptionApi,
    error::{PortalError, Result},
    models::{Subscription, SubscriptionId, SubscriptionStatus, format_money},
    router::{Navigation, Route},
    view,
};

/// Message shown when the subscription cannot be fetched.
pub const NOT_FOUND: &str = "Subscription not found";

/// A server-side action offered on the status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    /// Renew now.
    Renew,
    /// Switch off auto-renewal.
    Cancel,
}

impl StatusAction {
    /// Confirmation prompt shown before the request.
    #[must_use]
    pub const fn confirmation(self) -> &'static str {
        match self {
            Self::Renew => "Are you sure you want to renew this subscription now?",
            Self::Cancel => {
                "Are you sure you want to cancel this subscription? It will remain active until \
                 the end of the billing period."
            }
        }
    }

    /// Alert text when the server gives no reason for a failure.
    #[must_use]
    pub const fn failure_fallback(self) -> &'static str {
        match self {
            Self::Renew => "Failed to renew subscription",
            Self::Cancel => "Failed to cancel subscription",
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Renew => "renew",
            Self::Cancel => "cancel",
        }
    }
}

/// Result of a confirmed-or-not status action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The user declined the confirmation; nothing was sent.
    NotConfirmed,
    /// The server accepted; holds the alerted message.
    Completed(String),
    /// The server refused or the request failed; holds the alerted message.
    Failed(String),
}

/// Subscription detail with renew/cancel actions.
#[derive(Debug, Clone)]
pub struct StatusPage {
    id: SubscriptionId,
    state: LoadState<Subscription>,
    pending: Option<StatusAction>,
}

impl StatusPage {
    /// Mounts the page, fetching the subscription.
    pub async fn load<A: SubscriptionApi>(api: &A, id: SubscriptionId) -> Self {
        let mut page = Self {
            id,
            state: LoadState::Loading,
            pending: None,
        };
        page.reload(api).await;
        page
    }

    /// Re-fetches the subscription.
    pub async fn reload<A: SubscriptionApi>(&mut self, api: &A) {
        self.state = match api.get_subscription(self.id).await {
            Ok(subscription) => {
                info!(
                    subscription_id = %self.id,
                    status = %subscription.status,
                    "subscription loaded"
                );
                LoadState::Ready(subscription)
            }
            Err(e) => {
                warn!(subscription_id = %self.id, error = %e, "failed to load subscription");
                LoadState::Failed(NOT_FOUND.to_owned())
            }
        };
    }

    /// Subscription id from the route.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns the fetch state.
    #[must_use]
    pub const fn state(&self) -> &LoadState<Subscription> {
        &self.state
    }

    /// Action currently in flight, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<StatusAction> {
        self.pending
    }

    /// "Renew Now" is offered for active subscriptions.
    #[must_use]
    pub fn can_renew(&self) -> bool {
        self.state
            .ready()
            .is_some_and(|s| s.status == SubscriptionStatus::Active)
    }

    /// "Cancel Subscription" is offered for active subscriptions that auto-renew.
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        self.state
            .ready()
            .is_some_and(|s| s.status == SubscriptionStatus::Active && s.auto_renew)
    }

    /// "Retry Payment" is offered after a failed payment.
    #[must_use]
    pub fn can_retry_payment(&self) -> bool {
        self.state
            .ready()
            .is_some_and(|s| s.status == SubscriptionStatus::PaymentFailed)
    }

    /// Renews the subscription after confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidInput`] if renewal is not offered.
    pub async fn renew<A: SubscriptionApi, D: Dialog>(
        &mut self,
        api: &A,
        dialog: &D,
    ) -> Result<ActionOutcome> {
        if !self.can_renew() {
            return Err(PortalError::InvalidInput(
                "renewal is only offered for active subscriptions".to_owned(),
            ));
        }
        self.run(api, dialog, StatusAction::Renew).await
    }

    /// Cancels auto-renewal after confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidInput`] if cancellation is not offered.
    pub async fn cancel<A: SubscriptionApi, D: Dialog>(
        &mut self,
        api: &A,
        dialog: &D,
    ) -> Result<ActionOutcome> {
        if !self.can_cancel() {
            return Err(PortalError::InvalidInput(
                "cancellation is only offered for active subscriptions with auto-renewal on".to_owned(),
            ));
        }
        self.run(api, dialog, StatusAction::Cancel).await
    }

    async fn run<A: SubscriptionApi, D: Dialog>(
        &mut self,
        api: &A,
        dialog: &D,
        action: StatusAction,
    ) -> Result<ActionOutcome> {
        if self.pending.is_some() {
            return Err(PortalError::InvalidInput("another action is in progress".to_owned()));
        }
        if !dialog.confirm(action.confirmation()) {
            return Ok(ActionOutcome::NotConfirmed);
        }

        self.pending = Some(action);
        let result = match action {
            StatusAction::Renew => api.renew_subscription(self.id).await,
            StatusAction::Cancel => api.cancel_subscription(self.id).await,
        };
        self.pending = None;

        match result {
            Ok(response) => {
                info!(
                    subscription_id = %self.id,
                    action = action.as_str(),
                    "status action completed"
                );
                dialog.alert(&response.message);
                self.reload(api).await;
                Ok(ActionOutcome::Completed(response.message))
            }
            Err(e) => {
                warn!(
                    subscription_id = %self.id,
                    action = action.as_str(),
                    error = %e,
                    "status action failed"
                );
                let fallback = action.failure_fallback();
                let message = e.server_error().unwrap_or(fallback).to_owned();
                dialog.alert(&message);
                Ok(ActionOutcome::Failed(message))
            }
        }
    }

    /// "Retry Payment" navigation.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidInput`] unless the last payment failed.
    pub fn retry_payment(&self) -> Result<Navigation> {
        if !self.can_retry_payment() {
            return Err(PortalError::InvalidInput(
                "retry is only offered after a failed payment".to_owned(),
            ));
        }
        Ok(Navigation::to(Route::Payment(self.id)))
    }

    /// "Back to Plans" navigation.
    #[must_use]
    pub const fn back(&self) -> Navigation {
        Navigation::to(Route::Plans)
    }
}

impl fmt::Display for StatusPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscription = match &self.state {
            LoadState::Loading => return writeln!(f, "Loading subscription details..."),
            LoadState::Failed(message) => return view::error_alert(f, message),
            LoadState::Ready(subscription) => subscription,
        };
        let plan = &subscription.plan;

        writeln!(f, "[← Back to Plans] back")?;
        writeln!(f)?;
        writeln!(f, "Subscription Details")?;
        writeln!(f, "{} {}", plan.name, view::badge(&subscription.status))?;
        view::field(
            f,
            "User",
            format!("{} <{}>", subscription.user.name, subscription.user.email),
        )?;
        view::field(
            f,
            "Price",
            view::price_per_cycle(plan.price, &plan.billing_cycle),
        )?;
        view::field(f, "Start Date", subscription.start_date.date_display())?;
        view::field(f, "End Date", subscription.end_date.date_display())?;
        if let Some(next) = &subscription.next_billing_date {
            view::field(f, "Next Billing Date", next.date_display())?;
        }
        let auto_renew = if subscription.auto_renew { "Yes" } else { "No" };
        view::field(f, "Auto Renewal", auto_renew)?;
        writeln!(f, "Plan Features")?;
        view::bullets(f, &plan.features)?;

        let processing = |action| self.pending == Some(action);
        if self.can_renew() {
            let label = if processing(StatusAction::Renew) {
                "Processing..."
            } else {
                "Renew Now"
            };
            writeln!(f, "[{label}] renew")?;
        }
        if self.can_cancel() {
            let label = if processing(StatusAction::Cancel) {
                "Processing..."
            } else {
                "Cancel Subscription"
            };
            writeln!(f, "[{label}] cancel")?;
        }
        if self.can_retry_payment() {
            writeln!(f, "[Retry Payment] retry")?;
        }

        if !subscription.payments.is_empty() {
            writeln!(f)?;
            writeln!(f, "Payment History")?;
            writeln!(
                f,
                "{:<24} {:>10}  {:<24} Status",
                "Date", "Amount", "Transaction ID"
            )?;
            for payment in &subscription.payments {
                writeln!(
                    f,
                    "{:<24} {:>10}  {:<24} {}",
                    payment.payment_date.datetime_display(),
                    format_money(payment.amount),
                    payment.transaction_id.as_deref().unwrap_or_default(),
                    payment.status.as_str(),
                )?;
            }
        }
        Ok(())
    }
}
