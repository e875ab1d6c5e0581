// src/logging.rs

//! `tracing` subscriber setup.
//!
//! The filter is chosen in this order:
//! 1. the level handed in by the host (normally `[logging].level`),
//! 2. the `BUCKETDAG_LOG` environment variable, which accepts full
//!    `EnvFilter` directives such as `bucketdag::dag=trace,warn`,
//! 3. `info`.
//!
//! Output goes to stderr.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::types::LogLevel;

/// Environment variable read when no level is configured.
pub const LOG_ENV: &str = "BUCKETDAG_LOG";

/// Install the global subscriber. Errors if one is already installed.
pub fn init_logging(level: Option<LogLevel>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::new(level.as_directive()),
        None => filter_from_env(),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(LogLevel::Info.as_directive()))
}

impl LogLevel {
    /// The level as an `EnvFilter` directive.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
