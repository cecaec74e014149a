//! Subscription API data models.
//!
//! These are the response and request shapes exchanged with the subscription
//! API. The portal never owns or mutates them; it renders what the server
//! returns and asks the server for transitions.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PortalError, Result};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw numeric identifier.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = PortalError;

            fn from_str(s: &str) -> Result<Self> {
                s.trim().parse::<u64>().map(Self).map_err(|_| {
                    PortalError::InvalidInput(format!("{} must be a number, got '{s}'", $label))
                })
            }
        }
    };
}

numeric_id!(
    /// Identifier of a plan in the catalog.
    PlanId,
    "plan id"
);
numeric_id!(
    /// Identifier of a subscription record.
    SubscriptionId,
    "subscription id"
);
numeric_id!(
    /// Identifier of a user.
    UserId,
    "user id"
);
numeric_id!(
    /// Identifier of a payment record.
    PaymentId,
    "payment id"
);

/// Recurrence period for a plan's price.
///
/// Unknown cycles are kept in [`BillingCycle::Other`]; the catalog leaves
/// such plans out of both groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BillingCycle {
    /// Billed every month.
    Monthly,
    /// Billed every year.
    Yearly,
    /// Any cycle this client does not know about.
    Other(String),
}

impl BillingCycle {
    /// Returns the unit used in "per month" / "per year" captions.
    ///
    /// Unknown cycles are shown by their wire name.
    #[must_use]
    pub fn interval_display(&self) -> &str {
        match self {
            Self::Monthly => "month",
            Self::Yearly => "year",
            Self::Other(other) => other,
        }
    }

    /// Returns the wire name (`monthly` / `yearly`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for BillingCycle {
    fn from(value: String) -> Self {
        match value.as_str() {
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            _ => Self::Other(value),
        }
    }
}

impl From<BillingCycle> for String {
    fn from(value: BillingCycle) -> Self {
        match value {
            BillingCycle::Other(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchasable subscription tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Plan identifier.
    pub id: PlanId,
    /// Display name.
    pub name: String,
    /// Price per billing cycle.
    pub price: Decimal,
    /// Billing cycle.
    pub billing_cycle: BillingCycle,
    /// Ordered feature list.
    #[serde(default)]
    pub features: Vec<String>,
}

/// A user as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// Full name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Account creation time (present on direct lookups only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<ApiTimestamp>,
}

/// Lifecycle status of a subscription.
///
/// Unknown values are preserved in [`SubscriptionStatus::Other`] so they can
/// still be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubscriptionStatus {
    /// Paid and running.
    Active,
    /// Created, waiting for the first payment.
    Pending,
    /// Auto-renewal switched off by the user.
    Cancelled,
    /// The last payment attempt failed.
    PaymentFailed,
    /// Any status this client does not know about.
    Other(String),
}

impl SubscriptionStatus {
    /// Returns the wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
            Self::PaymentFailed => "payment_failed",
            Self::Other(other) => other,
        }
    }

    /// Returns the badge label: first `_` replaced by a space, upper-cased.
    ///
    /// # Examples
    ///
    /// ```
    /// use subscription_portal::models::SubscriptionStatus;
    ///
    /// assert_eq!(SubscriptionStatus::PaymentFailed.label(), "PAYMENT FAILED");
    /// assert_eq!(SubscriptionStatus::Active.label(), "ACTIVE");
    /// ```
    #[must_use]
    pub fn label(&self) -> String {
        self.as_str().replacen('_', " ", 1).to_uppercase()
    }

    /// Returns the badge style class for this status.
    #[must_use]
    pub const fn badge_class(&self) -> &'static str {
        match self {
            Self::Active => "badge-active",
            Self::Pending => "badge-pending",
            Self::Cancelled => "badge-cancelled",
            Self::PaymentFailed => "badge-payment_failed",
            Self::Other(_) => "badge",
        }
    }
}

impl From<String> for SubscriptionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "active" => Self::Active,
            "pending" => Self::Pending,
            "cancelled" => Self::Cancelled,
            "payment_failed" => Self::PaymentFailed,
            _ => Self::Other(value),
        }
    }
}

impl From<SubscriptionStatus> for String {
    fn from(value: SubscriptionStatus) -> Self {
        match value {
            SubscriptionStatus::Other(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome recorded for a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    /// Payment went through.
    Completed,
    /// Payment was declined or errored.
    Failed,
    /// Any status this client does not know about.
    Other(String),
}

impl PaymentStatus {
    /// Returns the wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Other(other) => other,
        }
    }

    /// Completed payments reuse the active badge, everything else the failure badge.
    #[must_use]
    pub const fn badge_class(&self) -> &'static str {
        match self {
            Self::Completed => "badge-active",
            Self::Failed | Self::Other(_) => "badge-payment_failed",
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Other(value),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::Other(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}

/// A payment attempt against a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment identifier.
    pub id: PaymentId,
    /// Charged amount.
    pub amount: Decimal,
    /// Gateway transaction id.
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Payment outcome.
    pub status: PaymentStatus,
    /// When the payment was recorded.
    pub payment_date: ApiTimestamp,
}

/// Full subscription detail with embedded plan, user and payment history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Subscription identifier.
    pub id: SubscriptionId,
    /// Subscribed plan.
    pub plan: Plan,
    /// Subscriber.
    pub user: User,
    /// Lifecycle status.
    pub status: SubscriptionStatus,
    /// Start of the current period.
    pub start_date: ApiTimestamp,
    /// End of the current period.
    pub end_date: ApiTimestamp,
    /// Next charge, if scheduled.
    #[serde(default)]
    pub next_billing_date: Option<ApiTimestamp>,
    /// Whether the subscription renews automatically.
    #[serde(default)]
    pub auto_renew: bool,
    /// Payment history, newest first.
    #[serde(default)]
    pub payments: Vec<Payment>,
}

/// Most recent payment attached to a subscription summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastPayment {
    /// Payment outcome.
    #[serde(default)]
    pub status: Option<PaymentStatus>,
    /// Gateway transaction id.
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// When the payment was recorded.
    #[serde(default)]
    pub payment_date: Option<ApiTimestamp>,
}

/// Row of a user's subscription list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSummary {
    /// Subscription identifier.
    pub id: SubscriptionId,
    /// Name of the subscribed plan.
    pub plan_name: String,
    /// Plan price per billing cycle.
    pub price: Decimal,
    /// Plan billing cycle.
    pub billing_cycle: BillingCycle,
    /// Lifecycle status.
    pub status: SubscriptionStatus,
    /// Next charge, if scheduled.
    #[serde(default)]
    pub next_billing_date: Option<ApiTimestamp>,
    /// Plan features.
    #[serde(default)]
    pub features: Vec<String>,
    /// Start of the current period.
    #[serde(default)]
    pub start_date: Option<ApiTimestamp>,
    /// End of the current period.
    #[serde(default)]
    pub end_date: Option<ApiTimestamp>,
    /// Whether the subscription renews automatically.
    #[serde(default)]
    pub auto_renew: bool,
    /// Most recent payment, if any.
    #[serde(default)]
    pub last_payment: Option<LastPayment>,
}

/// Body of `POST /subscribe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    /// Subscriber's full name.
    pub name: String,
    /// Subscriber's email.
    pub email: String,
    /// Plan to subscribe to.
    pub plan_id: PlanId,
}

/// Response of `POST /subscribe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeResponse {
    /// Newly created (pending) subscription.
    pub subscription_id: SubscriptionId,
    /// Informational message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Failure scenario the payment simulator can be forced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    /// Card declined due to insufficient funds.
    #[serde(rename = "insufficient_funds")]
    InsufficientFunds,
    /// Card has expired.
    #[serde(rename = "expired_card")]
    ExpiredCard,
    /// Generic decline from the issuing bank.
    #[serde(rename = "generic_decline")]
    GenericDecline,
    /// Processing network error.
    #[serde(rename = "network_error")]
    NetworkError,
    /// 3-D Secure authentication failed.
    #[serde(rename = "3d_secure_failed")]
    ThreeDSecureFailed,
}

impl FailureReason {
    /// All scenarios, in picker order.
    pub const ALL: [Self; 5] = [
        Self::InsufficientFunds,
        Self::ExpiredCard,
        Self::GenericDecline,
        Self::NetworkError,
        Self::ThreeDSecureFailed,
    ];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsufficientFunds => "insufficient_funds",
            Self::ExpiredCard => "expired_card",
            Self::GenericDecline => "generic_decline",
            Self::NetworkError => "network_error",
            Self::ThreeDSecureFailed => "3d_secure_failed",
        }
    }

    /// Returns the button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InsufficientFunds => "Insufficient Funds",
            Self::ExpiredCard => "Expired Card",
            Self::GenericDecline => "Card Declined",
            Self::NetworkError => "Network Error",
            Self::ThreeDSecureFailed => "3D Secure Failed",
        }
    }

    /// Returns the scenario description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InsufficientFunds => "Card declined due to insufficient funds",
            Self::ExpiredCard => "Payment card has expired",
            Self::GenericDecline => "Generic card decline from bank",
            Self::NetworkError => "Payment processing network error",
            Self::ThreeDSecureFailed => "Payment authentication failed",
        }
    }
}

impl FromStr for FailureReason {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|reason| reason.as_str() == s)
            .ok_or_else(|| PortalError::InvalidInput(format!("unknown failure reason '{s}'")))
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the payment simulator should decide the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMode {
    /// Force a successful payment.
    ForceSuccess,
    /// Force a failure with the given reason.
    ForceFailure(FailureReason),
    /// Let the API decide.
    Auto,
}

/// Body of `POST /payment/simulate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSimulationRequest {
    /// Subscription being paid for.
    pub subscription_id: SubscriptionId,
    /// Forced outcome, omitted in auto mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_success: Option<bool>,
    /// Forced failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_failure_reason: Option<FailureReason>,
}

impl PaymentSimulationRequest {
    /// Builds the request body for a payment mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use subscription_portal::models::{PaymentMode, PaymentSimulationRequest, SubscriptionId};
    ///
    /// let request = PaymentSimulationRequest::new(SubscriptionId(7), PaymentMode::Auto);
    /// assert_eq!(serde_json::to_string(&request).unwrap(), r#"{"subscription_id":7}"#);
    /// ```
    #[must_use]
    pub const fn new(subscription_id: SubscriptionId, mode: PaymentMode) -> Self {
        let (force_success, force_failure_reason) = match mode {
            PaymentMode::ForceSuccess => (Some(true), None),
            PaymentMode::ForceFailure(reason) => (Some(false), Some(reason)),
            PaymentMode::Auto => (None, None),
        };
        Self {
            subscription_id,
            force_success,
            force_failure_reason,
        }
    }
}

/// Raw response of `POST /payment/simulate`, for both 200 and 400 answers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentResponse {
    /// Whether the payment succeeded.
    pub success: bool,
    /// Gateway transaction id.
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Human readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Charged amount.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Payment status (`completed` / `failed`).
    #[serde(default)]
    pub status: Option<String>,
    /// Error code on failure.
    #[serde(default)]
    pub error_code: Option<String>,
    /// Error reason on failure.
    #[serde(default)]
    pub error_reason: Option<String>,
    /// Processing time.
    #[serde(default)]
    pub processed_at: Option<ApiTimestamp>,
}

/// Summary of a successful payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    /// Gateway transaction id.
    pub transaction_id: Option<String>,
    /// Charged amount.
    pub amount: Option<Decimal>,
    /// Payment status text.
    pub status: Option<String>,
    /// Currency code.
    pub currency: Option<String>,
}

/// Structured failure fields surfaced verbatim on the payment page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentErrorDetails {
    /// Error code (e.g. `card_declined`).
    pub code: Option<String>,
    /// Error reason (e.g. `expired_card`).
    pub reason: Option<String>,
    /// Transaction id of the failed attempt.
    pub transaction_id: Option<String>,
}

/// Result of a payment simulation the API actually processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The payment went through.
    Succeeded(PaymentReceipt),
    /// The payment was declined.
    Declined {
        /// Server message, if any.
        message: Option<String>,
        /// Structured failure fields.
        details: PaymentErrorDetails,
    },
}

impl From<PaymentResponse> for PaymentOutcome {
    fn from(response: PaymentResponse) -> Self {
        if response.success {
            Self::Succeeded(PaymentReceipt {
                transaction_id: response.transaction_id,
                amount: response.amount,
                status: response.status,
                currency: response.currency,
            })
        } else {
            Self::Declined {
                message: response.message,
                details: PaymentErrorDetails {
                    code: response.error_code,
                    reason: response.error_reason,
                    transaction_id: response.transaction_id,
                },
            }
        }
    }
}

/// Response of the renew and cancel endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionResponse {
    /// Message to show the user.
    #[serde(default)]
    pub message: String,
    /// Success flag.
    #[serde(default)]
    pub success: Option<bool>,
    /// Transaction id of the renewal charge.
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// New end of period after a renewal.
    #[serde(default)]
    pub new_end_date: Option<ApiTimestamp>,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiHealth {
    /// Health status reported by the API.
    pub status: String,
    /// Informational message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Timestamp exactly as the API sent it.
///
/// The API mixes SQLite (`2024-01-15 10:30:00`), ISO-8601 and RFC 3339
/// renderings. The raw text is kept; parsing happens only for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiTimestamp(pub String);

impl ApiTimestamp {
    /// Returns the raw text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the timestamp into a naive local date-time.
    #[must_use]
    pub fn parse(&self) -> Option<NaiveDateTime> {
        let raw = self.0.trim();
        for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(parsed);
            }
        }
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.naive_local());
        }
        if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
            return Some(parsed.naive_local());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }

    /// Formats the date part as `M/D/YYYY`, or returns the raw text.
    ///
    /// # Examples
    ///
    /// ```
    /// use subscription_portal::models::ApiTimestamp;
    ///
    /// let ts = ApiTimestamp("2024-01-05 10:30:00.123456".to_owned());
    /// assert_eq!(ts.date_display(), "1/5/2024");
    /// ```
    #[must_use]
    pub fn date_display(&self) -> String {
        self.parse().map_or_else(
            || self.0.clone(),
            |parsed| parsed.format("%-m/%-d/%Y").to_string(),
        )
    }

    /// Formats as `M/D/YYYY, H:MM:SS AM`, or returns the raw text.
    #[must_use]
    pub fn datetime_display(&self) -> String {
        self.parse().map_or_else(
            || self.0.clone(),
            |parsed| parsed.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        )
    }
}

impl From<&str> for ApiTimestamp {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Formats an amount the way the pages show prices (`$9.99`, `$10`).
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("${}", amount.normalize())
}
