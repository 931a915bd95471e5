//! Tracing subscriber setup
//!
//! Filter precedence: `--verbose`, then `BT_LOG`, then `log.level`.
//! Everything goes to stderr so stdout stays parseable.

use crate::config::{LogConfig, LogFormat};
use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

/// Environment variable holding filter directives
pub const LOG_ENV: &str = "BT_LOG";

/// Build the filter for this run
#[must_use]
pub fn build_filter(config: &LogConfig, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber
///
/// Does nothing if a subscriber is already installed.
pub fn init(config: &LogConfig, verbose: bool) {
    let filter = build_filter(config, verbose);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Text => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_forces_debug() {
        let config = LogConfig {
            level: "warn".to_string(),
            format: LogFormat::Text,
        };
        assert_eq!(build_filter(&config, true).to_string(), "debug");
    }

    #[test]
    fn init_twice_is_harmless() {
        let config = LogConfig::default();
        init(&config, false);
        init(&config, false);
    }
}
