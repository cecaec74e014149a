//! Structured logging for the portal CLI.
//!
//! Logs go to stderr so rendered pages on stdout stay readable.

use std::io::{self, IsTerminal};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparsable.
///
/// Request logs would interleave with the interactive session, so only
/// warnings and errors are shown by default.
pub const DEFAULT_FILTER: &str = "warn";

/// Log line encoding on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Reads `LOG_FORMAT` (`json` or `pretty`, default `pretty`).
    #[must_use]
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("LOG_FORMAT").unwrap_or_default())
    }

    /// Parses a format name; anything but `json` is pretty.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Builds the event filter from `RUST_LOG`-style directives.
fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global tracing subscriber.
///
/// Exactly one of the two stderr layers is active; the other is `None`.
/// ANSI colors are only used when stderr is a terminal.
///
/// # Environment Variables
///
/// - `LOG_FORMAT`: `json` or `pretty` (default: `pretty`)
/// - `RUST_LOG`: filter directives (default: [`DEFAULT_FILTER`])
pub fn init_observability(format: LogFormat) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = env_filter(directives.as_deref());

    let (pretty, json) = match format {
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .compact()
                .with_ansi(io::stderr().is_terminal())
                .with_writer(io::stderr);
            (Some(layer), None)
        }
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_writer(io::stderr);
            (None, Some(layer))
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(""), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("unknown"), LogFormat::Pretty);
    }

    #[test]
    fn test_env_filter_defaults_to_warn() {
        assert_eq!(env_filter(None).to_string(), DEFAULT_FILTER);
    }

    #[test]
    fn test_env_filter_uses_directives() {
        let filter = env_filter(Some("subscription_portal=debug"));
        assert_eq!(filter.to_string(), "subscription_portal=debug");
    }
}
