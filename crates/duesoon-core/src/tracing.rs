//! Logging setup for the `duesoon` binary.
//!
//! Three presets cover every way the notifier is run:
//!
//! - [`TracingConfig::default`]: one compact line per event, `info` and up
//! - [`TracingConfig::cli_debug`]: `debug` and up, with module and source line
//! - [`TracingConfig::scheduled`]: JSON lines for cron jobs and log collectors
//!
//! `RUST_LOG` always wins over the preset level. Logs go to stderr so that
//! `preview` and `events --json` keep stdout machine-readable.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Logging could not be installed.
#[derive(Debug, Error)]
#[error("failed to install the log subscriber: {0}")]
pub struct TracingError(#[from] tracing::subscriber::SetGlobalDefaultError);

/// Line format of log records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single line.
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

/// Which records are kept and how they are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Lowest level kept for duesoon's own crates when `RUST_LOG` is unset.
    pub level: Level,
    /// Line format.
    pub format: LogFormat,
    /// Adds the module path and source line to each record, drops the timestamp.
    pub verbose: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Compact,
            verbose: false,
        }
    }
}

impl TracingConfig {
    /// Preset for `--debug`.
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::Compact,
            verbose: true,
        }
    }

    /// Preset for `--json-logs`.
    #[must_use]
    pub fn scheduled() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Json,
            verbose: false,
        }
    }

    /// Overrides the level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Filter used when `RUST_LOG` is unset. Matches every `duesoon_*` crate.
    pub fn directive(&self) -> String {
        format!("duesoon={}", self.level)
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()))
    }
}

/// Installs the global subscriber. Call once, before any command runs.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.filter();
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.verbose)
        .with_file(config.verbose)
        .with_line_number(config.verbose);

    let layer = match (config.format, config.verbose) {
        (LogFormat::Json, _) => layer.json().boxed(),
        (LogFormat::Compact, true) => layer.compact().without_time().boxed(),
        (LogFormat::Compact, false) => layer.compact().boxed(),
    };

    tracing::subscriber::set_global_default(tracing_subscriber::registry().with(filter).with(layer))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        assert_eq!(TracingConfig::default().level, Level::INFO);
        assert!(!TracingConfig::default().verbose);

        let debug = TracingConfig::cli_debug();
        assert_eq!(debug.level, Level::DEBUG);
        assert!(debug.verbose);

        assert_eq!(TracingConfig::scheduled().format, LogFormat::Json);
    }

    #[test]
    fn directive_covers_all_crates() {
        assert_eq!(TracingConfig::default().directive(), "duesoon=INFO");
        assert_eq!(
            TracingConfig::scheduled().with_level(Level::DEBUG).directive(),
            "duesoon=DEBUG"
        );
    }

    #[test]
    fn second_install_fails() {
        let _ = init_tracing(TracingConfig::default());
        let err = init_tracing(TracingConfig::scheduled()).unwrap_err();
        assert!(err.to_string().starts_with("failed to install the log subscriber"));
    }
}
