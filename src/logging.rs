use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, Once};
use tracing_subscriber::EnvFilter;

use crate::config::{DEFAULT_LOG_FILTER, LOG_ENV};

static TRACING_INIT: Once = Once::new();

/// Send `tracing` output to `log_path`. The terminal is owned by the TUI, so
/// nothing is written to stdout or stderr.
///
/// The filter comes from `$BUDGET_TRACKER_LOG` and defaults to
/// `budget_tracker=info`.
pub(crate) fn init(log_path: &Path) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    TRACING_INIT.call_once(|| {
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(log_file))
            .try_init();
        if installed.is_err() {
            eprintln!("tracing subscriber already set; logging to the existing one");
        }
    });
    Ok(())
}
