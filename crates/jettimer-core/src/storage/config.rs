//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Countdown step and blink cadence
//! - Alarm sound and vibration settings
//!
//! Configuration is stored at `~/.config/jettimer/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::timer::{TimerSettings, DEFAULT_BLINK_PERIOD_MS, DEFAULT_STEP_MS};

/// Countdown engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,
    #[serde(default = "default_blink_period_ms")]
    pub blink_period_ms: u64,
}

/// Alarm configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default = "default_true")]
    pub vibration: bool,
    #[serde(default = "default_vibration_pattern")]
    pub vibration_pattern: Vec<u64>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/jettimer/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_step_ms() -> u64 {
    DEFAULT_STEP_MS
}
fn default_blink_period_ms() -> u64 {
    DEFAULT_BLINK_PERIOD_MS
}
fn default_true() -> bool {
    true
}
fn default_vibration_pattern() -> Vec<u64> {
    TimerSettings::default().vibration_pattern
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            step_ms: default_step_ms(),
            blink_period_ms: default_blink_period_ms(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: true,
            vibration: true,
            vibration_pattern: default_vibration_pattern(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("timer.step_ms", self.timer.step_ms),
            ("timer.blink_period_ms", self.timer.blink_period_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
        }
        // Labels refresh on whole seconds, so every second must be a tick.
        if 1_000 % self.timer.step_ms != 0 {
            return Err(ConfigError::InvalidValue {
                key: "timer.step_ms".to_string(),
                message: "must divide 1000".to_string(),
            });
        }
        Ok(())
    }

    /// Coordinator settings derived from this configuration.
    pub fn timer_settings(&self) -> TimerSettings {
        let vibration_pattern = if self.notifications.enabled && self.notifications.vibration {
            self.notifications.vibration_pattern.clone()
        } else {
            Vec::new()
        };
        TimerSettings {
            step_ms: self.timer.step_ms,
            blink_period_ms: self.timer.blink_period_ms,
            vibration_pattern,
            ..TimerSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[timer]\nstep_ms = 250\n").unwrap();
        assert_eq!(parsed.timer.step_ms, 250);
        assert_eq!(parsed.timer.blink_period_ms, 500);
        assert!(parsed.notifications.sound);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.step_ms").as_deref(), Some("100"));
        assert_eq!(cfg.get("notifications.vibration").as_deref(), Some("true"));
        assert_eq!(
            cfg.get("notifications.vibration_pattern").as_deref(),
            Some("[130,130,130,130]")
        );
        assert!(cfg.get("timer.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("timer.step_ms", "250").unwrap();
        cfg.set("notifications.sound", "false").unwrap();
        cfg.set("notifications.vibration_pattern", "[50, 100]").unwrap();
        assert_eq!(cfg.timer.step_ms, 250);
        assert!(!cfg.notifications.sound);
        assert_eq!(cfg.notifications.vibration_pattern, vec![50, 100]);
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("timer.nonexistent", "1"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(matches!(
            cfg.set("notifications.sound", "loud"),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(matches!(
            cfg.set("timer.step_ms", "0"),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(matches!(
            cfg.set("timer.step_ms", "300"),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn disabled_vibration_clears_pattern() {
        let mut cfg = Config::default();
        assert_eq!(cfg.timer_settings().vibration_pattern, vec![130, 130, 130, 130]);
        cfg.notifications.vibration = false;
        let settings = cfg.timer_settings();
        assert!(settings.vibration_pattern.is_empty());
        assert_eq!(settings.step_ms, 100);
    }

    #[test]
    fn load_from_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.set("timer.blink_period_ms", "750").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().timer.blink_period_ms, 750);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timer = 5").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));

        std::fs::write(&path, "[timer]\nstep_ms = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
    }
}
