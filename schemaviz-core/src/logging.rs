//! Logging setup shared by schemaviz binaries.
//!
//! Logs go to stderr; stdout is reserved for the link or the document.

use crate::Result;
use std::str::FromStr;

/// Output format of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other} (expected text or json)")),
        }
    }
}

/// Maps CLI verbosity flags to a maximum level.
///
/// * `verbose` - 0=INFO, 1=DEBUG, 2+=TRACE
/// * `quiet` - only ERROR, regardless of `verbose`
pub const fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

/// Initializes the global subscriber.
///
/// # Errors
/// Returns a configuration error if a global subscriber is already set
///
/// # Example
/// ```rust,no_run
/// use schemaviz_core::logging::{LogFormat, init_logging};
///
/// // Initialize at DEBUG level
/// init_logging(1, false, LogFormat::Text).expect("Failed to initialize logging");
/// ```
pub fn init_logging(verbose: u8, quiet: bool, format: LogFormat) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level_for(verbose, quiet))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let initialized = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    initialized.map_err(|e| {
        crate::error::SchemaVizError::configuration(format!("Failed to initialize logging: {}", e))
    })
}
