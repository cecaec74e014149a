//! Subscription Portal: a client for browsing plans, subscribing, simulating
//! payments and managing subscriptions over a REST API.
//!
//! # What is Subscription Portal?
//!
//! A page-routed client application layered over an external subscription
//! API. The backend owns every entity and every transition; this crate only
//! fetches, renders and asks:
//!
//! - **Typed API client**: [`api::SubscriptionApi`] with a reqwest-backed
//!   [`api::HttpApi`]
//! - **Pages**: one view-model per screen in [`pages`], each tracking its own
//!   loading/error/success state and rendering itself as text
//! - **Navigation**: [`router::Route`] plus the [`app::App`] navigator that
//!   mounts a fresh page per route and drives it with [`command::Command`]s
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────┐
//! │  Terminal / user   │  commands in, rendered pages out
//! └─────────┬──────────┘
//!           │
//! ┌─────────▼─────────────────────────────────────┐
//! │              Subscription Portal              │
//! │  ┌────────┐   ┌─────────┐   ┌──────────────┐  │
//! │  │  App   │───│  Pages  │───│ Subscription │  │
//! │  │ router │   │ (state) │   │   API trait  │  │
//! │  └────────┘   └─────────┘   └──────┬───────┘  │
//! └────────────────────────────────────┼──────────┘
//!                                      │ HTTP + JSON
//! ┌────────────────────────────────────▼──────────┐
//! │  Subscription API (plans, subscriptions,      │
//! │  payment simulation, user lookup)             │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! # Routes
//!
//! | Path | Page |
//! |------|------|
//! | `/` | [`pages::PlansPage`] |
//! | `/subscribe/:planId` | [`pages::SubscribePage`] |
//! | `/payment/:subscriptionId` | [`pages::PaymentPage`] |
//! | `/subscription/:subscriptionId` | [`pages::StatusPage`] |
//! | `/my-subscriptions` | [`pages::MySubscriptionsPage`] |
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use subscription_portal::{api::{HttpApi, SubscriptionApi}, pages::PlanGroups};
//!
//! # async fn example() -> subscription_portal::Result<()> {
//! let api = HttpApi::new("http://localhost:5000/api")?;
//! let groups = PlanGroups::partition(api.list_plans().await?);
//! println!("{} monthly, {} yearly", groups.monthly.len(), groups.yearly.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Library calls return [`Result`]. Pages swallow API failures into the one
//! message they display; see [`error`] for the variants.
//!
//! ```rust
//! use subscription_portal::{PortalError, router::Route};
//!
//! match Route::parse("/nowhere") {
//!     Ok(route) => println!("route {route}"),
//!     Err(PortalError::InvalidRoute(path)) => eprintln!("no page at {path}"),
//!     Err(e) => eprintln!("unexpected: {e}"),
//! }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest"
)]

pub mod api;
pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod router;
pub mod view;

pub use api::{HttpApi, SubscriptionApi};
pub use app::App;
pub use config::PortalConfig;
pub use error::{PortalError, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _ = std::marker::PhantomData::<PortalError>;
        let _ = std::marker::PhantomData::<App<HttpApi, ()>>;
    }
}
