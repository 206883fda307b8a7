//! Runtime configuration, read from the environment.

use std::path::PathBuf;

/// Environment variable overriding the state file location.
pub const DB_ENV: &str = "PAWTRACK_DB";
/// Environment variable that disables the sample routine on first run.
pub const NO_SEED_ENV: &str = "PAWTRACK_NO_SEED";

/// Default number of dates in the history index.
pub const DEFAULT_HISTORY_DAYS: u32 = 14;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Path of the JSON state file.
    pub db_path: PathBuf,
    /// Start from the sample routine when no state has been saved yet.
    pub seed_on_first_run: bool,
    /// Length of the history date index.
    pub history_days: u32,
}

impl Config {
    /// Builds the configuration from `PAWTRACK_DB` and `PAWTRACK_NO_SEED`.
    pub fn from_env() -> Self {
        Self {
            db_path: db_path(),
            seed_on_first_run: !std::env::var(NO_SEED_ENV)
                .map(|v| is_truthy(&v))
                .unwrap_or(false),
            history_days: DEFAULT_HISTORY_DAYS,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Returns the path to the state file.
///
/// The path is determined in the following order:
/// 1. `PAWTRACK_DB` environment variable.
/// 2. `~/.local/share/pawtrack/state.json` (on Linux).
/// 3. `./state.json` (fallback).
///
/// The directory is created lazily on first save.
fn db_path() -> PathBuf {
    std::env::var(DB_ENV).map(PathBuf::from).unwrap_or_else(|_| match dirs::data_local_dir() {
        Some(mut p) => {
            p.push("pawtrack");
            p.push("state.json");
            p
        }
        None => PathBuf::from("state.json"),
    })
}
