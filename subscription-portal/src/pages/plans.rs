//! Plan listing page (`/`).

use std::fmt;

use tracing::{debug, info, warn};

use super::LoadState;
use crate::{
    api::SubscriptionApi,
    error::{PortalError, Result},
    models::{BillingCycle, Plan, PlanId, format_money},
    router::{Navigation, Route},
    view,
};

/// Message shown when the catalog cannot be fetched.
pub const LOAD_FAILED: &str = "Failed to load plans";

/// Plans split by billing cycle, each group in server order.
///
/// Plans with an unrecognised cycle belong to neither group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanGroups {
    /// Plans billed monthly.
    pub monthly: Vec<Plan>,
    /// Plans billed yearly.
    pub yearly: Vec<Plan>,
}

impl PlanGroups {
    /// Partitions plans by billing cycle, preserving order within each group.
    #[must_use]
    pub fn partition(plans: Vec<Plan>) -> Self {
        let mut groups = Self::default();
        for plan in plans {
            match plan.billing_cycle {
                BillingCycle::Monthly => groups.monthly.push(plan),
                BillingCycle::Yearly => groups.yearly.push(plan),
                BillingCycle::Other(ref cycle) => {
                    debug!(plan_id = %plan.id, cycle = %cycle, "plan has no listing group");
                }
            }
        }
        groups
    }

    /// Finds a plan in either group.
    #[must_use]
    pub fn find(&self, id: PlanId) -> Option<&Plan> {
        self.monthly
            .iter()
            .chain(&self.yearly)
            .find(|plan| plan.id == id)
    }

    /// Total number of plans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.monthly.len() + self.yearly.len()
    }

    /// Returns `true` when the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The plan catalog page.
#[derive(Debug, Clone)]
pub struct PlansPage {
    state: LoadState<PlanGroups>,
}

impl PlansPage {
    /// Mounts the page, fetching the catalog once.
    pub async fn load<A: SubscriptionApi>(api: &A) -> Self {
        let state = match api.list_plans().await {
            Ok(plans) => {
                let groups = PlanGroups::partition(plans);
                info!(
                    monthly = groups.monthly.len(),
                    yearly = groups.yearly.len(),
                    "plans loaded"
                );
                LoadState::Ready(groups)
            }
            Err(e) => {
                warn!(error = %e, "failed to load plans");
                LoadState::Failed(LOAD_FAILED.to_owned())
            }
        };
        Self { state }
    }

    /// Returns the fetch state.
    #[must_use]
    pub const fn state(&self) -> &LoadState<PlanGroups> {
        &self.state
    }

    /// "Subscribe Now" on a listed plan.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidInput`] if the plan is not on the page.
    pub fn subscribe(&self, id: PlanId) -> Result<Navigation> {
        self.state
            .ready()
            .and_then(|groups| groups.find(id))
            .map(|plan| Navigation::to(Route::Subscribe(plan.id)))
            .ok_or_else(|| PortalError::InvalidInput(format!("plan {id} is not listed")))
    }
}

fn plan_card(f: &mut fmt::Formatter<'_>, plan: &Plan) -> fmt::Result {
    writeln!(f, "#{} {}", plan.id, plan.name)?;
    writeln!(f, "  {}", format_money(plan.price))?;
    writeln!(f, "  per {}", plan.billing_cycle.interval_display())?;
    for feature in &plan.features {
        writeln!(f, "  ✓ {feature}")?;
    }
    writeln!(f, "  [Subscribe Now] subscribe {}", plan.id)
}

impl fmt::Display for PlansPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            LoadState::Loading => writeln!(f, "Loading plans..."),
            LoadState::Failed(message) => view::error_alert(f, message),
            LoadState::Ready(groups) => {
                writeln!(f, "Choose Your Plan")?;
                writeln!(f)?;
                writeln!(f, "Monthly Plans")?;
                for plan in &groups.monthly {
                    plan_card(f, plan)?;
                }
                writeln!(f)?;
                writeln!(f, "Annual Plans (Save 17%)")?;
                for plan in &groups.yearly {
                    plan_card(f, plan)?;
                }
                Ok(())
            }
        }
    }
}
