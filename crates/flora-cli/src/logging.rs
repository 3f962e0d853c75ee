//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! # Log Levels
//!
//! - `error`: unreadable inputs, failed writes
//! - `warn`: skipped files, dropped trait records
//! - `info`: stage progress and summary counts
//! - `debug`: per-document and per-sentence counts
//! - `trace`: every retained or rejected match
//!
//! `RUST_LOG` is honored unless a level was given on the command line.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Crates whose events follow the configured level. Everything else stays at
/// `warn`.
const FLORA_CRATES: &[&str] = &[
    "flora",
    "flora_cli",
    "flora_core",
    "flora_model",
    "flora_normalization",
    "flora_report",
    "flora_terms",
];

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` replace `level_filter` when it is set.
    pub use_env_filter: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON format for machine parsing.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

impl LogConfig {
    /// The filter directives used when `RUST_LOG` does not apply.
    pub fn directives(&self) -> String {
        let level = self.level_filter.to_string().to_lowercase();
        let mut directives = vec![LevelFilter::WARN.min(self.level_filter).to_string().to_lowercase()];
        directives.extend(FLORA_CRATES.iter().map(|name| format!("{name}={level}")));
        directives.join(",")
    }
}

/// Initializes the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        install(config, Mutex::new(file));
    } else {
        install(config, io::stderr);
    }
    Ok(())
}

fn install<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(build_env_filter(config));
    let layer = fmt::layer().with_writer(writer).with_target(false);
    match config.format {
        LogFormat::Json => registry
            .with(layer.json().with_span_events(fmt::format::FmtSpan::CLOSE))
            .init(),
        LogFormat::Compact => registry
            .with(layer.compact().without_time().with_ansi(config.with_ansi))
            .init(),
        LogFormat::Pretty => registry
            .with(layer.without_time().with_ansi(config.with_ansi))
            .init(),
    }
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    if config.use_env_filter
        && let Ok(filter) = EnvFilter::try_from_default_env()
    {
        return filter;
    }
    EnvFilter::new(config.directives())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_cover_workspace_crates() {
        let config = LogConfig {
            level_filter: LevelFilter::DEBUG,
            ..LogConfig::default()
        };
        insta::assert_snapshot!(
            config.directives(),
            @"warn,flora=debug,flora_cli=debug,flora_core=debug,flora_model=debug,flora_normalization=debug,flora_report=debug,flora_terms=debug"
        );
    }

    #[test]
    fn test_quiet_level_applies_to_dependencies() {
        let config = LogConfig {
            level_filter: LevelFilter::ERROR,
            ..LogConfig::default()
        };
        assert!(config.directives().starts_with("error,"));
    }
}
