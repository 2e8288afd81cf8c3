use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const HOME_ENV: &str = "BUDGET_TRACKER_HOME";
pub(crate) const LOG_ENV: &str = "BUDGET_TRACKER_LOG";
pub(crate) const DEFAULT_LOG_FILTER: &str = "budget_tracker=info";

const DB_FILE: &str = "budget_tracker.db";
const LOG_FILE: &str = "budget_tracker.log";

/// Where the tracker keeps its files.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
}

impl Config {
    /// `$BUDGET_TRACKER_HOME` when set, otherwise the platform data directory.
    pub(crate) fn load() -> Result<Self> {
        let data_dir = match std::env::var_os(HOME_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => default_data_dir()?,
        };
        Self::in_dir(&data_dir)
    }

    pub(crate) fn in_dir(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    pub(crate) fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }

    /// Default target for `export` when no path is given.
    pub(crate) fn default_export_path() -> PathBuf {
        directories::UserDirs::new()
            .map(|d| d.home_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("budget-tracker-export.csv")
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "budgettracker", "BudgetTracker")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

/// Expand a leading `~/` to the home directory.
pub(crate) fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(dirs) = directories::UserDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(path)
}
