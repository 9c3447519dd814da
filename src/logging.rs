//! Tracing subscriber setup
//!
//! Logs go to stderr so the interactive prompt on stdout stays clean.

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive for the given settings.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` forces debug for this
/// crate, falling back to the configured level.
#[must_use]
pub fn filter_directive(config: &LoggingConfig, verbose: bool) -> String {
    let level = if verbose { "debug" } else { config.level.as_str() };
    format!("warn,airport_locator={level}")
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config, verbose)));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!("Logging already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("warn", false, "warn,airport_locator=warn")]
    #[case("info", false, "warn,airport_locator=info")]
    #[case("error", true, "warn,airport_locator=debug")]
    fn test_filter_directive(#[case] level: &str, #[case] verbose: bool, #[case] expected: &str) {
        let config = LoggingConfig {
            level: level.to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(filter_directive(&config, verbose), expected);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        let config = LoggingConfig::default();
        init(&config, false);
        init(&config, true);
    }
}
