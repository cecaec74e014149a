//! Subscription API abstraction.
//!
//! Pages talk to the backend only through [`SubscriptionApi`]. The production
//! implementation is [`HttpApi`]; tests substitute an in-memory fake.
//!
//! # Examples
//!
//! ```rust,no_run
//! use subscription_portal::api::{HttpApi, SubscriptionApi};
//!
//! # async fn example() -> subscription_portal::error::Result<()> {
//! let api = HttpApi::new("http://localhost:5000/api")?;
//! for plan in api.list_plans().await? {
//!     println!("{} {}", plan.name, plan.price);
//! }
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use crate::{
    error::Result,
    models::{
        ActionResponse, ApiHealth, PaymentOutcome, PaymentSimulationRequest, Plan, PlanId,
        SubscribeRequest, SubscribeResponse, Subscription, SubscriptionId, SubscriptionSummary,
        User, UserId,
    },
};

pub mod http;

pub use http::HttpApi;

/// Operations the portal needs from the subscription backend.
///
/// Every method issues exactly one request. No method retries.
pub trait SubscriptionApi: Send + Sync {
    /// `GET /plans`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a plan list.
    fn list_plans(&self) -> impl Future<Output = Result<Vec<Plan>>> + Send;

    /// `GET /plans/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::PortalError::ApiError`] with status 404 for unknown plans.
    fn get_plan(&self, id: PlanId) -> impl Future<Output = Result<Plan>> + Send;

    /// `POST /subscribe`
    ///
    /// # Errors
    ///
    /// Returns the server error (e.g. an existing active subscription) as
    /// [`crate::error::PortalError::ApiError`].
    fn subscribe<'a>(
        &'a self,
        request: &'a SubscribeRequest,
    ) -> impl Future<Output = Result<SubscribeResponse>> + Send + 'a;

    /// `POST /payment/simulate`
    ///
    /// A declined payment is a successful call returning
    /// [`PaymentOutcome::Declined`], even though the server answers 400.
    ///
    /// # Errors
    ///
    /// Returns error when the server rejects the request itself (unknown or
    /// non-pending subscription) or the request fails.
    fn simulate_payment<'a>(
        &'a self,
        request: &'a PaymentSimulationRequest,
    ) -> impl Future<Output = Result<PaymentOutcome>> + Send + 'a;

    /// `GET /subscriptions/status/{id}`
    ///
    /// # Errors
    ///
    /// Returns error if the subscription does not exist or the request fails.
    fn get_subscription(
        &self,
        id: SubscriptionId,
    ) -> impl Future<Output = Result<Subscription>> + Send;

    /// `POST /subscriptions/{id}/renew`
    ///
    /// # Errors
    ///
    /// Returns error if the server refuses the renewal or the request fails.
    fn renew_subscription(
        &self,
        id: SubscriptionId,
    ) -> impl Future<Output = Result<ActionResponse>> + Send;

    /// `POST /subscriptions/{id}/cancel`
    ///
    /// # Errors
    ///
    /// Returns error if the server refuses the cancellation or the request fails.
    fn cancel_subscription(
        &self,
        id: SubscriptionId,
    ) -> impl Future<Output = Result<ActionResponse>> + Send;

    /// `GET /users/{email}`
    ///
    /// # Errors
    ///
    /// Returns error if no user has this email or the request fails.
    fn find_user_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> impl Future<Output = Result<User>> + Send + 'a;

    /// `GET /subscriptions/{userId}`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    fn list_user_subscriptions(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<SubscriptionSummary>>> + Send;

    /// `GET /health`
    ///
    /// # Errors
    ///
    /// Returns error if the API is unreachable or unhealthy.
    fn health(&self) -> impl Future<Output = Result<ApiHealth>> + Send;
}
