//! [`PreferencePort`] over the SQLite kv table.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Database;
use crate::error::Result;
use crate::ports::PreferencePort;

const DURATION_KEY: &str = "timer.duration_ms";
const TEMP_DURATION_KEY: &str = "timer.temp_duration_ms";
const RUNNING_KEY: &str = "timer.running";

/// Timer preferences persisted in the `kv` table.
pub struct SqlitePreferences {
    db: Mutex<Database>,
}

impl SqlitePreferences {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// Open the default on-disk database.
    pub fn open() -> Result<Self> {
        Ok(Self::new(Database::open()?))
    }

    fn db(&self) -> MutexGuard<'_, Database> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        match self.db().kv_get(key) {
            Ok(value) => value.and_then(|v| v.parse().ok()),
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read preference");
                None
            }
        }
    }

    fn write(&self, key: &str, value: impl ToString) -> Result<()> {
        self.db().kv_set(key, &value.to_string())?;
        Ok(())
    }
}

impl PreferencePort for SqlitePreferences {
    fn duration(&self) -> u64 {
        self.read(DURATION_KEY).unwrap_or(0)
    }

    fn set_duration(&self, millis: u64) -> Result<()> {
        self.write(DURATION_KEY, millis)
    }

    fn temp_duration(&self) -> u64 {
        self.read(TEMP_DURATION_KEY).unwrap_or(0)
    }

    fn set_temp_duration(&self, millis: u64) -> Result<()> {
        self.write(TEMP_DURATION_KEY, millis)
    }

    fn running(&self) -> bool {
        self.read(RUNNING_KEY).unwrap_or(false)
    }

    fn set_running(&self, running: bool) -> Result<()> {
        self.write(RUNNING_KEY, running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        let prefs = SqlitePreferences::new(Database::open_memory().unwrap());
        assert_eq!(prefs.duration(), 0);
        assert_eq!(prefs.temp_duration(), 0);
        assert!(!prefs.running());
    }

    #[test]
    fn values_round_trip_through_kv() {
        let prefs = SqlitePreferences::new(Database::open_memory().unwrap());
        prefs.set_duration(90_000).unwrap();
        prefs.set_temp_duration(150_000).unwrap();
        prefs.set_running(true).unwrap();

        assert_eq!(prefs.duration(), 90_000);
        assert_eq!(prefs.temp_duration(), 150_000);
        assert!(prefs.running());
        assert_eq!(
            prefs.db().kv_get(DURATION_KEY).unwrap().as_deref(),
            Some("90000")
        );
    }

    #[test]
    fn garbage_values_fall_back() {
        let db = Database::open_memory().unwrap();
        db.kv_set(DURATION_KEY, "not a number").unwrap();
        let prefs = SqlitePreferences::new(db);
        assert_eq!(prefs.duration(), 0);
    }
}
