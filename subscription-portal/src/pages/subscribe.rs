//! Subscribe form page (`/subscribe/:planId`).

use std::fmt;

use tracing::{info, warn};

use super::{LoadState, require, require_email};
use crate::{
    api::SubscriptionApi,
    error::{PortalError, Result},
    models::{Plan, PlanId, SubscribeRequest},
    router::{Navigation, Route},
    view,
};

/// Message shown when the plan cannot be fetched.
pub const PLAN_NOT_FOUND: &str = "Plan not found";

/// Fallback when the server gives no reason for a failed submit.
pub const SUBMIT_FAILED: &str = "Failed to create subscription";

/// The subscribe form for one plan.
#[derive(Debug, Clone)]
pub struct SubscribePage {
    plan_id: PlanId,
    plan: LoadState<Plan>,
    name: String,
    email: String,
    submitting: bool,
    error: Option<String>,
}

impl SubscribePage {
    /// Mounts the page, fetching the plan named by the route.
    pub async fn load<A: SubscriptionApi>(api: &A, plan_id: PlanId) -> Self {
        let plan = match api.get_plan(plan_id).await {
            Ok(plan) => LoadState::Ready(plan),
            Err(e) => {
                warn!(%plan_id, error = %e, "failed to load plan");
                LoadState::Failed(PLAN_NOT_FOUND.to_owned())
            }
        };
        Self {
            plan_id,
            plan,
            name: String::new(),
            email: String::new(),
            submitting: false,
            error: None,
        }
    }

    /// Returns the plan fetch state.
    #[must_use]
    pub const fn plan(&self) -> &LoadState<Plan> {
        &self.plan
    }

    /// Current name field value.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current email field value.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Error from the last submit, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns `true` while a submit is in flight.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Sets the "Full Name" field.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Sets the "Email Address" field.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Builds the request body from the form.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidInput`] if the plan is not loaded or a
    /// required field is missing or malformed.
    pub fn request(&self) -> Result<SubscribeRequest> {
        if self.plan.ready().is_none() {
            return Err(PortalError::InvalidInput("there is no plan to subscribe to".to_owned()));
        }
        Ok(SubscribeRequest {
            name: require("name", &self.name)?,
            email: require_email(&self.email)?,
            plan_id: self.plan_id,
        })
    }

    /// Submits the form.
    ///
    /// On success returns the navigation to the payment page. A server failure
    /// is kept on the page and yields `Ok(None)`. A submit while another is in
    /// flight is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidInput`] if the form is incomplete; no
    /// request is sent.
    pub async fn submit<A: SubscriptionApi>(&mut self, api: &A) -> Result<Option<Navigation>> {
        if self.submitting {
            return Ok(None);
        }
        let request = self.request()?;

        self.submitting = true;
        self.error = None;
        let result = api.subscribe(&request).await;
        self.submitting = false;

        match result {
            Ok(response) => {
                info!(subscription_id = %response.subscription_id, "subscription requested");
                Ok(Some(Navigation::to(Route::Payment(response.subscription_id))))
            }
            Err(e) => {
                warn!(error = %e, "subscribe failed");
                self.error = Some(e.server_error().unwrap_or(SUBMIT_FAILED).to_owned());
                Ok(None)
            }
        }
    }
}

impl fmt::Display for SubscribePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = match &self.plan {
            LoadState::Loading => return writeln!(f, "Loading..."),
            LoadState::Failed(message) => return view::error_alert(f, message),
            LoadState::Ready(plan) => plan,
        };

        writeln!(f, "Subscribe to {}", plan.name)?;
        if let Some(error) = &self.error {
            view::error_alert(f, error)?;
        }
        writeln!(f)?;
        writeln!(f, "Plan Details")?;
        view::field(
            f,
            "Price",
            view::price_per_cycle(plan.price, &plan.billing_cycle),
        )?;
        writeln!(f, "Features:")?;
        view::bullets(f, &plan.features)?;
        writeln!(f)?;
        writeln!(f, "Your Information")?;
        view::field(f, "Full Name", &self.name)?;
        view::field(f, "Email Address", &self.email)?;
        if self.submitting {
            writeln!(f, "[Processing...]")
        } else {
            writeln!(f, "[Continue to Payment] submit")
        }
    }
}
