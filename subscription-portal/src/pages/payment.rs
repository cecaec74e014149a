//! Payment simulation page (`/payment/:subscriptionId`).

use std::{fmt, time::Duration};

use tracing::{info, warn};

use crate::{
    api::SubscriptionApi,
    error::{PortalError, Result},
    models::{
        FailureReason, PaymentErrorDetails, PaymentMode, PaymentOutcome, PaymentReceipt,
        PaymentSimulationRequest, SubscriptionId, format_money,
    },
    router::{Navigation, Route},
    view,
};

/// Fallback when a failed payment carries no message.
pub const PAYMENT_FAILED: &str = "Payment processing failed";

/// A failed payment as shown on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentFailure {
    /// Headline message.
    pub message: String,
    /// Structured fields; `None` when the server sent no body.
    pub details: Option<PaymentErrorDetails>,
}

impl PaymentFailure {
    fn from_error(error: &PortalError) -> Self {
        match error.api_body() {
            Some(body) => Self {
                message: body
                    .message
                    .clone()
                    .or_else(|| body.error.clone())
                    .unwrap_or_else(|| PAYMENT_FAILED.to_owned()),
                details: Some(PaymentErrorDetails {
                    code: body.error_code.clone(),
                    reason: body.error_reason.clone(),
                    transaction_id: body.transaction_id.clone(),
                }),
            },
            None => Self {
                message: PAYMENT_FAILED.to_owned(),
                details: None,
            },
        }
    }
}

/// What the payment page is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentState {
    /// Waiting for the user to pick a mode.
    Idle,
    /// The last attempt failed; the user may try again.
    Failed(PaymentFailure),
    /// Payment went through; a redirect is pending.
    Succeeded(PaymentReceipt),
}

/// The payment simulation page for one subscription.
#[derive(Debug, Clone)]
pub struct PaymentPage {
    subscription_id: SubscriptionId,
    redirect_delay: Duration,
    processing: bool,
    state: PaymentState,
}

impl PaymentPage {
    /// Mounts the page. Nothing is fetched until the user pays.
    #[must_use]
    pub const fn new(subscription_id: SubscriptionId, redirect_delay: Duration) -> Self {
        Self {
            subscription_id,
            redirect_delay,
            processing: false,
            state: PaymentState::Idle,
        }
    }

    /// Subscription being paid for.
    #[must_use]
    pub const fn subscription_id(&self) -> SubscriptionId {
        self.subscription_id
    }

    /// Current page state.
    #[must_use]
    pub const fn state(&self) -> &PaymentState {
        &self.state
    }

    /// Returns `true` while a payment request is in flight.
    #[must_use]
    pub const fn is_processing(&self) -> bool {
        self.processing
    }

    /// Runs one payment simulation.
    ///
    /// On success returns the delayed navigation to the status page. On
    /// failure the page shows the server's message and fields and stays put.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidInput`] if the payment already succeeded.
    pub async fn pay<A: SubscriptionApi>(
        &mut self,
        api: &A,
        mode: PaymentMode,
    ) -> Result<Option<Navigation>> {
        if matches!(self.state, PaymentState::Succeeded(_)) {
            return Err(PortalError::InvalidInput("payment already completed".to_owned()));
        }
        if self.processing {
            return Ok(None);
        }

        let request = PaymentSimulationRequest::new(self.subscription_id, mode);
        self.processing = true;
        self.state = PaymentState::Idle;
        let result = api.simulate_payment(&request).await;
        self.processing = false;

        match result {
            Ok(PaymentOutcome::Succeeded(receipt)) => {
                info!(
                    subscription_id = %self.subscription_id,
                    transaction_id = receipt.transaction_id.as_deref(),
                    "payment succeeded"
                );
                self.state = PaymentState::Succeeded(receipt);
                Ok(Some(Navigation::after(
                    Route::Status(self.subscription_id),
                    self.redirect_delay,
                )))
            }
            Ok(PaymentOutcome::Declined { message, details }) => {
                info!(
                    subscription_id = %self.subscription_id,
                    reason = details.reason.as_deref(),
                    "payment declined"
                );
                self.state = PaymentState::Failed(PaymentFailure {
                    message: message.unwrap_or_else(|| PAYMENT_FAILED.to_owned()),
                    details: Some(details),
                });
                Ok(None)
            }
            Err(e) => {
                warn!(
                    subscription_id = %self.subscription_id,
                    error = %e,
                    "payment request failed"
                );
                self.state = PaymentState::Failed(PaymentFailure::from_error(&e));
                Ok(None)
            }
        }
    }
}

fn opt(value: Option<&str>) -> &str {
    value.unwrap_or_default()
}

impl fmt::Display for PaymentPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let PaymentState::Succeeded(receipt) = &self.state {
            writeln!(f, "✓ Payment Successful!")?;
            view::field(f, "Transaction ID", opt(receipt.transaction_id.as_deref()))?;
            view::field(
                f,
                "Amount",
                receipt.amount.map(format_money).unwrap_or_default(),
            )?;
            view::field(f, "Status", opt(receipt.status.as_deref()))?;
            return writeln!(f, "Your subscription is now active. Redirecting...");
        }

        writeln!(f, "Payment Processing")?;
        if let PaymentState::Failed(failure) = &self.state {
            writeln!(f, "! Payment Failed")?;
            writeln!(f, "  {}", failure.message)?;
            if let Some(details) = &failure.details {
                writeln!(f, "  Error Code: {}", opt(details.code.as_deref()))?;
                writeln!(f, "  Reason: {}", opt(details.reason.as_deref()))?;
                if let Some(transaction_id) = &details.transaction_id {
                    writeln!(f, "  Transaction ID: {transaction_id}")?;
                }
            }
        }
        writeln!(f)?;

        let (pay, auto) = if self.processing {
            ("Processing Payment...", "Processing Payment...")
        } else {
            ("Process Payment", "Process Payment (Auto)")
        };
        writeln!(f, "Process Payment")?;
        writeln!(f, "  [{pay}] pay")?;
        writeln!(f, "  [{auto}] auto")?;
        writeln!(f)?;
        writeln!(f, "Common payment error scenarios:")?;
        for reason in FailureReason::ALL {
            writeln!(
                f,
                "  [{}] fail {}: {}",
                reason.label(),
                reason.as_str(),
                reason.description()
            )?;
        }
        Ok(())
    }
}
