//! Page navigator.
//!
//! [`App`] owns the API client and dialog, mounts a fresh page for every
//! route, and routes [`Command`]s to the current page.
//!
//! # Examples
//!
//! ```rust,no_run
//! use subscription_portal::{
//!     api::HttpApi, app::App, command::Command, config::PortalConfig, models::PlanId,
//!     pages::Dialog, router::Route,
//! };
//!
//! struct AlwaysYes;
//!
//! impl Dialog for AlwaysYes {
//!     fn confirm(&self, _message: &str) -> bool {
//!         true
//!     }
//!
//!     fn alert(&self, message: &str) {
//!         eprintln!("{message}");
//!     }
//! }
//!
//! # async fn example() -> subscription_portal::error::Result<()> {
//! let config = PortalConfig::default();
//! let api = HttpApi::with_config(&config.api)?;
//! let mut app = App::new(api, AlwaysYes, config.payment);
//!
//! app.open(Route::Plans).await;
//! app.execute(Command::Subscribe(PlanId(1))).await?;
//! println!("{app}");
//! # Ok(())
//! # }
//! ```

use std::fmt;

use tokio::time;
use tracing::{debug, info};

use crate::{
    api::SubscriptionApi,
    command::{Command, HELP},
    config::PaymentConfig,
    error::{PortalError, Result},
    models::PaymentMode,
    pages::{
        ActionOutcome, Dialog, MySubscriptionsPage, PaymentPage, PlansPage, StatusPage,
        SubscribePage,
    },
    router::{Navigation, Route},
    view,
};

/// The mounted page.
#[derive(Debug, Clone)]
pub enum Page {
    /// Nothing mounted yet.
    Blank,
    /// `/`
    Plans(PlansPage),
    /// `/subscribe/:planId`
    Subscribe(SubscribePage),
    /// `/payment/:subscriptionId`
    Payment(PaymentPage),
    /// `/subscription/:subscriptionId`
    Status(StatusPage),
    /// `/my-subscriptions`
    MySubscriptions(MySubscriptionsPage),
    /// A path that matches no route.
    NotFound(String),
}

impl Page {
    const fn name(&self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Plans(_) => "plans",
            Self::Subscribe(_) => "subscribe",
            Self::Payment(_) => "payment",
            Self::Status(_) => "subscription",
            Self::MySubscriptions(_) => "my-subscriptions",
            Self::NotFound(_) => "not-found",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => Ok(()),
            Self::Plans(page) => page.fmt(f),
            Self::Subscribe(page) => page.fmt(f),
            Self::Payment(page) => page.fmt(f),
            Self::Status(page) => page.fmt(f),
            Self::MySubscriptions(page) => page.fmt(f),
            Self::NotFound(path) => writeln!(f, "Page not found: {path}"),
        }
    }
}

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Re-render the current page.
    Continue,
    /// Render the current page, then follow the navigation.
    Navigate(Navigation),
    /// Show a message instead of the page.
    Message(String),
    /// Exit.
    Quit,
}

/// Client application: router plus the mounted page.
#[derive(Debug)]
pub struct App<A, D> {
    api: A,
    dialog: D,
    payment: PaymentConfig,
    route: Option<Route>,
    page: Page,
}

impl<A: SubscriptionApi, D: Dialog> App<A, D> {
    /// Creates an app with nothing mounted.
    pub const fn new(api: A, dialog: D, payment: PaymentConfig) -> Self {
        Self {
            api,
            dialog,
            payment,
            route: None,
            page: Page::Blank,
        }
    }

    /// The API client.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// The mounted page.
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Route of the mounted page; `None` before the first mount or on a
    /// not-found page.
    pub const fn route(&self) -> Option<Route> {
        self.route
    }

    /// Mounts a fresh page for `route`, fetching its data.
    pub async fn open(&mut self, route: Route) {
        info!(%route, "mounting page");
        let api = &self.api;
        self.page = match route {
            Route::Plans => Page::Plans(PlansPage::load(api).await),
            Route::Subscribe(plan_id) => Page::Subscribe(SubscribePage::load(api, plan_id).await),
            Route::Payment(id) => {
                Page::Payment(PaymentPage::new(id, self.payment.redirect_delay()))
            }
            Route::Status(id) => Page::Status(StatusPage::load(api, id).await),
            Route::MySubscriptions => Page::MySubscriptions(MySubscriptionsPage::new()),
        };
        self.route = Some(route);
    }

    /// Mounts the page for a raw path; unknown paths mount a not-found page.
    pub async fn open_path(&mut self, path: &str) {
        match Route::parse(path) {
            Ok(route) => self.open(route).await,
            Err(e) => {
                debug!(error = %e, "no route for path");
                self.route = None;
                self.page = Page::NotFound(path.to_owned());
            }
        }
    }

    /// Waits out the navigation delay, then mounts the target.
    pub async fn follow(&mut self, navigation: Navigation) {
        if let Some(delay) = navigation.delay {
            debug!(?delay, route = %navigation.route, "delaying navigation");
            time::sleep(delay).await;
        }
        self.open(navigation.route).await;
    }

    /// Runs a command and follows any resulting navigation.
    ///
    /// Returns `false` once the user asked to quit.
    ///
    /// # Errors
    ///
    /// Same as [`App::dispatch`].
    pub async fn execute(&mut self, command: Command) -> Result<bool> {
        match self.dispatch(command).await? {
            Control::Navigate(navigation) => self.follow(navigation).await,
            Control::Quit => return Ok(false),
            Control::Continue | Control::Message(_) => {}
        }
        Ok(true)
    }

    /// Runs a command against the mounted page.
    ///
    /// Navigation is returned rather than followed so the caller can render the
    /// current page first (the payment success panel before its redirect).
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidInput`] when the command is not offered by
    /// the current page or its input is invalid. No request is sent then.
    pub async fn dispatch(&mut self, command: Command) -> Result<Control> {
        debug!(?command, page = self.page.name(), "dispatching command");
        match &command {
            Command::Help => return Ok(Control::Message(HELP.to_owned())),
            Command::Quit => return Ok(Control::Quit),
            Command::Open(path) => {
                self.open_path(path).await;
                return Ok(Control::Continue);
            }
            Command::Home => return Ok(Control::Navigate(Navigation::to(Route::Plans))),
            Command::Reload => {
                return Ok(self.route.map_or(Control::Continue, |route| {
                    Control::Navigate(Navigation::to(route))
                }));
            }
            _ => {}
        }

        let navigation = match (command, &mut self.page) {
            (Command::Subscribe(plan_id), Page::Plans(page)) => page.subscribe(plan_id)?,

            (Command::Name(name), Page::Subscribe(page)) => {
                page.set_name(name);
                return Ok(Control::Continue);
            }
            (Command::Email(email), Page::Subscribe(page)) => {
                page.set_email(email);
                return Ok(Control::Continue);
            }
            (Command::Submit, Page::Subscribe(page)) => match page.submit(&self.api).await? {
                Some(navigation) => navigation,
                None => return Ok(Control::Continue),
            },

            (command @ (Command::Pay | Command::Auto | Command::Fail(_)), Page::Payment(page)) => {
                let mode = match command {
                    Command::Pay => PaymentMode::ForceSuccess,
                    Command::Fail(reason) => PaymentMode::ForceFailure(reason),
                    _ => PaymentMode::Auto,
                };
                match page.pay(&self.api, mode).await? {
                    Some(navigation) => navigation,
                    None => return Ok(Control::Continue),
                }
            }

            (Command::Renew, Page::Status(page)) => {
                log_outcome(&page.renew(&self.api, &self.dialog).await?);
                return Ok(Control::Continue);
            }
            (Command::Cancel, Page::Status(page)) => {
                log_outcome(&page.cancel(&self.api, &self.dialog).await?);
                return Ok(Control::Continue);
            }
            (Command::Retry, Page::Status(page)) => page.retry_payment()?,
            (Command::Back, Page::Status(page)) => page.back(),

            (Command::Email(email), Page::MySubscriptions(page)) => {
                page.set_email(email);
                return Ok(Control::Continue);
            }
            (Command::Search(email), Page::MySubscriptions(page)) => {
                if let Some(email) = email {
                    page.set_email(email);
                }
                page.search(&self.api).await?;
                return Ok(Control::Continue);
            }
            (Command::View(id), Page::MySubscriptions(page)) => page.view(id)?,

            (command, page) => {
                return Err(PortalError::InvalidInput(format!(
                    "{} is not available on the {} page",
                    verb(&command),
                    page.name()
                )));
            }
        };
        Ok(Control::Navigate(navigation))
    }
}

fn log_outcome(outcome: &ActionOutcome) {
    match outcome {
        ActionOutcome::NotConfirmed => debug!("action not confirmed"),
        ActionOutcome::Completed(message) => info!(%message, "action completed"),
        ActionOutcome::Failed(message) => info!(%message, "action failed"),
    }
}

const fn verb(command: &Command) -> &'static str {
    match command {
        Command::Open(_) => "open",
        Command::Home => "home",
        Command::Reload => "reload",
        Command::Subscribe(_) => "subscribe",
        Command::Name(_) => "name",
        Command::Email(_) => "email",
        Command::Submit => "submit",
        Command::Pay => "pay",
        Command::Auto => "auto",
        Command::Fail(_) => "fail",
        Command::Renew => "renew",
        Command::Cancel => "cancel",
        Command::Retry => "retry",
        Command::Back => "back",
        Command::Search(_) => "search",
        Command::View(_) => "view",
        Command::Help => "help",
        Command::Quit => "quit",
    }
}

impl<A, D> fmt::Display for App<A, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", view::HEADER)?;
        writeln!(f, "{}", "=".repeat(view::HEADER.len()))?;
        self.page.fmt(f)
    }
}
