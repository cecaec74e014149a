//! Terminal front end for the subscription portal.
//!
//! Renders the portal's pages as text and reads one command per line from
//! stdin. Type `help` inside a session for the command list.

mod health;
mod observability;
mod terminal;

use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use subscription_portal::{
    App, HttpApi, PortalConfig, SubscriptionApi,
    app::Control,
    command::Command,
    config::API_URL_ENV,
    pages::Dialog,
};
use tracing::info;

use crate::{
    health::{HealthReport, HealthStatus},
    observability::{LogFormat, init_observability},
    terminal::TerminalDialog,
};

#[derive(Debug, Parser)]
#[command(
    name = "subscription-portal",
    version,
    about,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Backend API base URL, e.g. `http://localhost:5000/api`.
    #[arg(long, value_name = "URL", env = API_URL_ENV)]
    api_url: Option<String>,

    /// Path to open first, e.g. `/subscription/12` or `/my-subscriptions`.
    #[arg(default_value = "/")]
    route: String,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Check the configuration and the API's health endpoint, print JSON.
    Health,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_observability(LogFormat::from_env());

    let config = load_config(cli.config.as_deref(), cli.api_url)?;

    match cli.command {
        Some(CliCommand::Health) => health(&config).await,
        None => {
            config.validate().context("invalid configuration")?;
            let api = HttpApi::with_config(&config.api)?;
            info!(api_url = %api.base_url(), "starting portal session");
            let app = App::new(api, TerminalDialog, config.payment);
            session(app, &cli.route).await
        }
    }
}

fn load_config(path: Option<&Path>, api_url: Option<String>) -> anyhow::Result<PortalConfig> {
    let config = match path {
        Some(path) => PortalConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => PortalConfig::default(),
    };
    Ok(config.with_env_overrides().with_api_url(api_url))
}

async fn health(config: &PortalConfig) -> anyhow::Result<()> {
    let report = HealthReport::collect(config).await;
    println!("{}", report.to_json()?);
    if report.status == HealthStatus::Unhealthy {
        anyhow::bail!("health check failed");
    }
    Ok(())
}

async fn session<A: SubscriptionApi, D: Dialog>(
    mut app: App<A, D>,
    start: &str,
) -> anyhow::Result<()> {
    app.open_path(start).await;
    render(&app)?;

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        prompt()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match app.dispatch(command).await {
            Ok(Control::Continue) => render(&app)?,
            Ok(Control::Navigate(navigation)) => {
                // Show the current page (payment receipt) before a delayed redirect.
                if navigation.delay.is_some() {
                    render(&app)?;
                }
                app.follow(navigation).await;
                render(&app)?;
            }
            Ok(Control::Message(message)) => println!("{message}"),
            Ok(Control::Quit) => break,
            Err(e) => eprintln!("{e}"),
        }
    }
    Ok(())
}

fn render<A, D>(app: &App<A, D>) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout)?;
    writeln!(stdout, "{app}")?;
    stdout.flush()
}

fn prompt() -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "> ")?;
    stdout.flush()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use subscription_portal::{models::SubscriptionId, router::Route};

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults_to_home_route() {
        let cli = Cli::try_parse_from(["subscription-portal"]).unwrap();
        assert_eq!(cli.route, "/");
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_route_and_health() {
        let cli = Cli::try_parse_from(["subscription-portal", "/subscription/12"]).unwrap();
        assert_eq!(cli.route, "/subscription/12");
        assert_eq!(
            Route::parse(&cli.route).unwrap(),
            Route::Status(SubscriptionId(12))
        );
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["subscription-portal", "health"]).unwrap();
        assert!(matches!(cli.command, Some(CliCommand::Health)));
    }

    #[test]
    fn test_load_config_flag_overrides_default() {
        let config = load_config(None, Some("https://billing.example.com/api".to_owned())).unwrap();
        assert_eq!(config.api.base_url, "https://billing.example.com/api");
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/portal.toml")), None);
        assert!(result.is_err());
    }
}
