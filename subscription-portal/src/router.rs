//! Client-side routes.
//!
//! | Path | Page |
//! |------|------|
//! | `/` | plan listing |
//! | `/subscribe/:planId` | subscribe form |
//! | `/payment/:subscriptionId` | payment simulation |
//! | `/subscription/:subscriptionId` | subscription status |
//! | `/my-subscriptions` | user subscription lookup |

use std::{fmt, str::FromStr, time::Duration};

use crate::{
    error::{PortalError, Result},
    models::{PlanId, SubscriptionId},
};

/// A client route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Plans,
    /// `/subscribe/:planId`
    Subscribe(PlanId),
    /// `/payment/:subscriptionId`
    Payment(SubscriptionId),
    /// `/subscription/:subscriptionId`
    Status(SubscriptionId),
    /// `/my-subscriptions`
    MySubscriptions,
}

impl Route {
    /// Parses a path into a route.
    ///
    /// Query strings, fragments and trailing slashes are ignored. Ids must be
    /// non-negative integers.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidRoute`] for unknown paths or bad ids.
    ///
    /// # Examples
    ///
    /// ```
    /// use subscription_portal::{models::PlanId, router::Route};
    ///
    /// assert_eq!(Route::parse("/subscribe/3/").unwrap(), Route::Subscribe(PlanId(3)));
    /// assert_eq!(Route::parse("/?ref=mail").unwrap(), Route::Plans);
    /// assert!(Route::parse("/subscribe/abc").is_err());
    /// ```
    pub fn parse(path: &str) -> Result<Self> {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default().trim();
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Some(Self::Plans),
            ["my-subscriptions"] => Some(Self::MySubscriptions),
            ["subscribe", id] => parse_id(id).map(|id| Self::Subscribe(PlanId(id))),
            ["payment", id] => parse_id(id).map(|id| Self::Payment(SubscriptionId(id))),
            ["subscription", id] => parse_id(id).map(|id| Self::Status(SubscriptionId(id))),
            _ => None,
        };
        route.ok_or_else(|| PortalError::InvalidRoute(path.into()))
    }
}

fn parse_id(segment: &str) -> Option<u64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

impl FromStr for Route {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plans => f.write_str("/"),
            Self::Subscribe(id) => write!(f, "/subscribe/{id}"),
            Self::Payment(id) => write!(f, "/payment/{id}"),
            Self::Status(id) => write!(f, "/subscription/{id}"),
            Self::MySubscriptions => f.write_str("/my-subscriptions"),
        }
    }
}

/// A request from a page to move to another route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    /// Target route.
    pub route: Route,
    /// How long to wait before mounting the target.
    pub delay: Option<Duration>,
}

impl Navigation {
    /// Navigates immediately.
    #[must_use]
    pub const fn to(route: Route) -> Self {
        Self { route, delay: None }
    }

    /// Navigates after `delay`.
    #[must_use]
    pub const fn after(route: Route, delay: Duration) -> Self {
        Self {
            route,
            delay: Some(delay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_routes() {
        assert_eq!(Route::parse("/").unwrap(), Route::Plans);
        assert_eq!(Route::parse("").unwrap(), Route::Plans);
        assert_eq!(
            Route::parse("/subscribe/3").unwrap(),
            Route::Subscribe(PlanId(3))
        );
        assert_eq!(
            Route::parse("/payment/12").unwrap(),
            Route::Payment(SubscriptionId(12))
        );
        assert_eq!(
            Route::parse("/subscription/12").unwrap(),
            Route::Status(SubscriptionId(12))
        );
        assert_eq!(
            Route::parse("/my-subscriptions").unwrap(),
            Route::MySubscriptions
        );
    }

    #[test]
    fn test_parse_ignores_trailing_slash_and_query() {
        assert_eq!(
            Route::parse("/my-subscriptions/").unwrap(),
            Route::MySubscriptions
        );
        assert_eq!(
            Route::parse("/subscription/7?tab=payments#history").unwrap(),
            Route::Status(SubscriptionId(7))
        );
    }

    #[test]
    fn test_parse_rejects_bad_ids() {
        for path in [
            "/subscribe/abc",
            "/payment/-1",
            "/payment/+4",
            "/subscription/1.5",
        ] {
            assert!(
                matches!(Route::parse(path), Err(PortalError::InvalidRoute(_))),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_unknown_paths() {
        for path in ["/plans", "/subscribe", "/subscribe/1/extra", "/admin"] {
            assert!(Route::parse(path).is_err(), "{path} should be rejected");
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let routes = [
            Route::Plans,
            Route::Subscribe(PlanId(1)),
            Route::Payment(SubscriptionId(2)),
            Route::Status(SubscriptionId(3)),
            Route::MySubscriptions,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.to_string()).unwrap(), route);
        }
    }

    #[test]
    fn test_navigation_constructors() {
        let nav = Navigation::after(Route::Plans, Duration::from_millis(2500));
        assert_eq!(nav.delay, Some(Duration::from_millis(2500)));
        assert!(Navigation::to(Route::Plans).delay.is_none());
    }
}
