//! Text commands that drive page actions.

use std::str::FromStr;

use crate::{
    error::{PortalError, Result},
    models::{FailureReason, PlanId, SubscriptionId},
};

/// Usage text listing every command.
pub const HELP: &str = "\
Commands:
  open <path>        go to a route (/, /subscribe/1, /payment/1, /subscription/1, /my-subscriptions)
  home               go to the plan listing
  reload             re-mount the current page
  subscribe <planId> [plans] subscribe to a listed plan
  name <text>        [subscribe] set the full name
  email <text>       [subscribe, my-subscriptions] set the email address
  submit             [subscribe] continue to payment
  pay                [payment] process payment (forced success)
  auto               [payment] process payment (server decides)
  fail <reason>      [payment] force a failure: insufficient_funds, expired_card,
                     generic_decline, network_error, 3d_secure_failed
  renew              [subscription] renew now
  cancel             [subscription] cancel auto-renewal
  retry              [subscription] retry a failed payment
  back               [subscription] back to plans
  search [email]     [my-subscriptions] look up subscriptions
  view <id>          [my-subscriptions] open a listed subscription
  help               show this text
  quit               exit";

/// A parsed user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Navigate to a path.
    Open(String),
    /// Navigate to `/`.
    Home,
    /// Re-mount the current page.
    Reload,
    /// "Subscribe Now" on a plan card.
    Subscribe(PlanId),
    /// Set the name field.
    Name(String),
    /// Set the email field.
    Email(String),
    /// Submit the subscribe form.
    Submit,
    /// Forced-success payment.
    Pay,
    /// Auto-mode payment.
    Auto,
    /// Forced-failure payment.
    Fail(FailureReason),
    /// Renew the subscription.
    Renew,
    /// Cancel auto-renewal.
    Cancel,
    /// Retry a failed payment.
    Retry,
    /// Back to plans.
    Back,
    /// Look up subscriptions, optionally setting the email first.
    Search(Option<String>),
    /// Open a listed subscription.
    View(SubscriptionId),
    /// Show usage.
    Help,
    /// Exit.
    Quit,
}

impl Command {
    /// Parses one input line.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidInput`] for unknown commands or missing
    /// and malformed arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use subscription_portal::{command::Command, models::{FailureReason, PlanId}};
    ///
    /// assert_eq!(Command::parse("subscribe 3").unwrap(), Command::Subscribe(PlanId(3)));
    /// assert_eq!(
    ///     Command::parse("fail expired_card").unwrap(),
    ///     Command::Fail(FailureReason::ExpiredCard)
    /// );
    /// assert_eq!(
    ///     Command::parse("name Ada Lovelace").unwrap(),
    ///     Command::Name("Ada Lovelace".into())
    /// );
    /// ```
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match verb.to_ascii_lowercase().as_str() {
            "open" | "go" => Self::Open(argument(verb, rest)?.to_owned()),
            "home" => Self::Home,
            "reload" | "refresh" => Self::Reload,
            "subscribe" => Self::Subscribe(argument(verb, rest)?.parse()?),
            "name" => Self::Name(argument(verb, rest)?.to_owned()),
            "email" => Self::Email(argument(verb, rest)?.to_owned()),
            "submit" => Self::Submit,
            "pay" => Self::Pay,
            "auto" => Self::Auto,
            "fail" => Self::Fail(argument(verb, rest)?.parse()?),
            "renew" => Self::Renew,
            "cancel" => Self::Cancel,
            "retry" => Self::Retry,
            "back" => Self::Back,
            "search" => Self::Search((!rest.is_empty()).then(|| rest.to_owned())),
            "view" => Self::View(argument(verb, rest)?.parse()?),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            "" => return Err(PortalError::InvalidInput("empty command".to_owned())),
            other => {
                return Err(PortalError::InvalidInput(format!(
                    "unknown command '{other}', type 'help' for a list"
                )));
            }
        };
        Ok(command)
    }
}

fn argument<'a>(verb: &str, rest: &'a str) -> Result<&'a str> {
    if rest.is_empty() {
        return Err(PortalError::InvalidInput(format!("'{verb}' needs an argument")));
    }
    Ok(rest)
}

impl FromStr for Command {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("pay").unwrap(), Command::Pay);
        assert_eq!(Command::parse("  AUTO  ").unwrap(), Command::Auto);
        assert_eq!(Command::parse("quit").unwrap(), Command::Quit);
        assert_eq!(Command::parse("?").unwrap(), Command::Help);
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(
            Command::parse("open /subscription/4").unwrap(),
            Command::Open("/subscription/4".into())
        );
        assert_eq!(
            Command::parse("view 12").unwrap(),
            Command::View(SubscriptionId(12))
        );
        assert_eq!(
            Command::parse("email  ada@example.com ").unwrap(),
            Command::Email("ada@example.com".into())
        );
        assert_eq!(
            Command::parse("fail 3d_secure_failed").unwrap(),
            Command::Fail(FailureReason::ThreeDSecureFailed)
        );
    }

    #[test]
    fn test_parse_search_optional_email() {
        assert_eq!(Command::parse("search").unwrap(), Command::Search(None));
        assert_eq!(
            Command::parse("search ada@example.com").unwrap(),
            Command::Search(Some("ada@example.com".into()))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("dance").is_err());
        assert!(Command::parse("subscribe").is_err());
        assert!(Command::parse("subscribe three").is_err());
        assert!(Command::parse("fail lost_card").is_err());
        assert!(Command::parse("name").is_err());
    }
}
