//! HTTP implementation of [`SubscriptionApi`] using reqwest.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::SubscriptionApi;
use crate::{
    config::ApiConfig,
    error::{ApiErrorBody, PortalError, Result},
    models::{
        ActionResponse, ApiHealth, PaymentOutcome, PaymentResponse, PaymentSimulationRequest,
        Plan, PlanId, SubscribeRequest, SubscribeResponse, Subscription, SubscriptionId,
        SubscriptionSummary, User, UserId,
    },
};

/// Subscription API client over HTTP.
///
/// Endpoint paths are appended to the base URL as percent-encoded segments,
/// so an email like `a b@x.io` becomes a single `/users/a%20b@x.io` segment.
///
/// # Examples
///
/// ```
/// use subscription_portal::{api::HttpApi, config::ApiConfig};
///
/// let api = HttpApi::with_config(&ApiConfig::default()).unwrap();
/// assert_eq!(api.base_url().as_str(), "http://localhost:5000/api");
/// ```
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    /// Creates a client for `base_url` with default connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidApiUrl`] if the URL is unusable.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(&ApiConfig {
            base_url: base_url.to_owned(),
            ..ApiConfig::default()
        })
    }

    /// Creates a client from configuration.
    ///
    /// Timeouts are only set when configured; otherwise reqwest defaults apply.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the client cannot be built.
    pub fn with_config(config: &ApiConfig) -> Result<Self> {
        config.validate()?;
        let base_url = config.parsed_base_url()?;

        let mut builder = Client::builder().pool_max_idle_per_host(config.pool_max_idle_per_host);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(connect_timeout);
        }
        let client = builder.build().map_err(PortalError::HttpError)?;

        Ok(Self { client, base_url })
    }

    /// Returns the base URL requests are built from.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the URL for an endpoint from raw path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                PortalError::InvalidApiUrl(format!("'{}' cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a request and returns status plus raw body.
    async fn execute(&self, request: RequestBuilder) -> Result<(StatusCode, Vec<u8>)> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        debug!(status = status.as_u16(), body_len = body.len(), "API response received");
        Ok((status, body))
    }

    /// Sends a request and decodes a 2xx JSON body.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let (status, body) = self.execute(request).await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        parse_body(&body)
    }
}

/// Converts a non-success response into [`PortalError::ApiError`].
fn api_error(status: StatusCode, body: &[u8]) -> PortalError {
    let body = serde_json::from_slice::<ApiErrorBody>(body).ok();
    warn!(
        status = status.as_u16(),
        error = body.as_ref().and_then(|b| b.error.as_deref()),
        "API returned error status"
    );
    PortalError::ApiError {
        status: status.as_u16(),
        body,
    }
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| PortalError::InvalidResponse(format!("failed to parse response: {e}")))
}

impl SubscriptionApi for HttpApi {
    #[instrument(skip(self))]
    async fn list_plans(&self) -> Result<Vec<Plan>> {
        let url = self.endpoint(&["plans"])?;
        let plans: Vec<Plan> = self.fetch(self.client.get(url)).await?;
        info!(count = plans.len(), "plans fetched");
        Ok(plans)
    }

    #[instrument(skip(self), fields(plan_id = %id))]
    async fn get_plan(&self, id: PlanId) -> Result<Plan> {
        let url = self.endpoint(&["plans", &id.to_string()])?;
        self.fetch(self.client.get(url)).await
    }

    #[instrument(skip(self, request), fields(plan_id = %request.plan_id))]
    async fn subscribe(&self, request: &SubscribeRequest) -> Result<SubscribeResponse> {
        let url = self.endpoint(&["subscribe"])?;
        let response: SubscribeResponse = self.fetch(self.client.post(url).json(request)).await?;
        info!(subscription_id = %response.subscription_id, "subscription created");
        Ok(response)
    }

    #[instrument(
        skip(self, request),
        fields(
            subscription_id = %request.subscription_id,
            force_success = ?request.force_success,
            force_failure_reason = ?request.force_failure_reason
        )
    )]
    async fn simulate_payment(&self, request: &PaymentSimulationRequest) -> Result<PaymentOutcome> {
        let url = self.endpoint(&["payment", "simulate"])?;
        let (status, body) = self.execute(self.client.post(url).json(request)).await?;

        if status.is_success() {
            let response: PaymentResponse = parse_body(&body)?;
            info!(success = response.success, "payment processed");
            return Ok(response.into());
        }

        // Declines arrive as 400 with a full payment body.
        if let Ok(response) = serde_json::from_slice::<PaymentResponse>(&body)
            && !response.success
        {
            info!(
                status = status.as_u16(),
                error_reason = response.error_reason.as_deref(),
                "payment declined"
            );
            return Ok(response.into());
        }

        Err(api_error(status, &body))
    }

    #[instrument(skip(self), fields(subscription_id = %id))]
    async fn get_subscription(&self, id: SubscriptionId) -> Result<Subscription> {
        let url = self.endpoint(&["subscriptions", "status", &id.to_string()])?;
        self.fetch(self.client.get(url)).await
    }

    #[instrument(skip(self), fields(subscription_id = %id))]
    async fn renew_subscription(&self, id: SubscriptionId) -> Result<ActionResponse> {
        let url = self.endpoint(&["subscriptions", &id.to_string(), "renew"])?;
        let response: ActionResponse = self.fetch(self.client.post(url)).await?;
        info!("subscription renewed");
        Ok(response)
    }

    #[instrument(skip(self), fields(subscription_id = %id))]
    async fn cancel_subscription(&self, id: SubscriptionId) -> Result<ActionResponse> {
        let url = self.endpoint(&["subscriptions", &id.to_string(), "cancel"])?;
        let response: ActionResponse = self.fetch(self.client.post(url)).await?;
        info!("subscription cancelled");
        Ok(response)
    }

    #[instrument(skip(self, email))]
    async fn find_user_by_email(&self, email: &str) -> Result<User> {
        let url = self.endpoint(&["users", email])?;
        self.fetch(self.client.get(url)).await
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_user_subscriptions(&self, user_id: UserId) -> Result<Vec<SubscriptionSummary>> {
        let url = self.endpoint(&["subscriptions", &user_id.to_string()])?;
        let subscriptions: Vec<SubscriptionSummary> = self.fetch(self.client.get(url)).await?;
        info!(count = subscriptions.len(), "user subscriptions fetched");
        Ok(subscriptions)
    }

    #[instrument(skip(self))]
    async fn health(&self) -> Result<ApiHealth> {
        let url = self.endpoint(&["health"])?;
        self.fetch(self.client.get(url)).await
    }
}
