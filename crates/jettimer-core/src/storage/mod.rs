mod config;
pub mod database;
mod preferences;

pub use config::{Config, NotificationsConfig, TimerConfig};
pub use database::Database;
pub use preferences::SqlitePreferences;

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/jettimer[-dev]/` based on JETTIMER_ENV.
///
/// Set JETTIMER_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("JETTIMER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("jettimer-dev")
    } else {
        base_dir.join("jettimer")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
