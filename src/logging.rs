//! File logging through `tracing-subscriber`.
//!
//! The terminal belongs to the UI, so log records only go to a file and
//! logging stays off when no file is configured.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

use crate::error::Result;

/// Environment variable overriding the configured level filter.
pub const LOG_LEVEL_ENV: &str = "TFM_LOG_LEVEL";

/// Build the level filter: `$TFM_LOG_LEVEL` wins over `level`.
pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_LEVEL))
}

/// Start logging to `file`. Returns whether a subscriber was installed.
pub fn init(file: Option<&Path>, level: &str) -> Result<bool> {
    let Some(path) = file else {
        return Ok(false);
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_timer(ChronoLocal::rfc_3339())
        .try_init()
        .is_ok();
    Ok(installed)
}
