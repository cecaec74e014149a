//! Shared text rendering helpers.

use std::fmt;

use rust_decimal::Decimal;

use crate::models::{BillingCycle, SubscriptionStatus, format_money};

/// Title shown above every page; doubles as the link back to `/`.
pub const HEADER: &str = "Subscription System";

/// `$9.99 per month`
#[must_use]
pub fn price_per_cycle(price: Decimal, cycle: &BillingCycle) -> String {
    format!("{} per {}", format_money(price), cycle.interval_display())
}

/// `[PAYMENT FAILED]`
#[must_use]
pub fn badge(status: &SubscriptionStatus) -> String {
    format!("[{}]", status.label())
}

pub(crate) fn error_alert(f: &mut fmt::Formatter<'_>, message: &str) -> fmt::Result {
    writeln!(f, "! {message}")
}

pub(crate) fn bullets<S: AsRef<str>>(f: &mut fmt::Formatter<'_>, items: &[S]) -> fmt::Result {
    for item in items {
        writeln!(f, "  - {}", item.as_ref())?;
    }
    Ok(())
}

pub(crate) fn field(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    value: impl fmt::Display,
) -> fmt::Result {
    writeln!(f, "{label}: {value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_per_cycle() {
        assert_eq!(
            price_per_cycle(Decimal::new(999, 2), &BillingCycle::Monthly),
            "$9.99 per month"
        );
        assert_eq!(
            price_per_cycle(Decimal::new(9990, 2), &BillingCycle::Yearly),
            "$99.9 per year"
        );

        let weekly = BillingCycle::Other("weekly".to_owned());
        assert_eq!(
            price_per_cycle(Decimal::new(500, 2), &weekly),
            "$5 per weekly"
        );
    }

    #[test]
    fn test_badge() {
        assert_eq!(badge(&SubscriptionStatus::Active), "[ACTIVE]");
        assert_eq!(
            badge(&SubscriptionStatus::PaymentFailed),
            "[PAYMENT FAILED]"
        );
    }
}
