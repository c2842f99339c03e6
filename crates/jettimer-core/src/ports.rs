//! External collaborators driven by the timer coordinator.
//!
//! The coordinator calls these while holding its state lock, so
//! implementations must not call back into the coordinator.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::error::Result;

/// Persistent timer preferences.
///
/// Getters fall back to `0` / `false` when nothing is stored or the store
/// cannot be read.
pub trait PreferencePort: Send + Sync {
    /// Configured timer length in milliseconds.
    fn duration(&self) -> u64;
    fn set_duration(&self, millis: u64) -> Result<()>;
    /// Total of the current run, including minutes added while it ran.
    fn temp_duration(&self) -> u64;
    fn set_temp_duration(&self, millis: u64) -> Result<()>;
    /// Whether a countdown was running when last persisted.
    fn running(&self) -> bool;
    fn set_running(&self, running: bool) -> Result<()>;
}

/// Ongoing/finished timer notification.
pub trait NotificationPort: Send + Sync {
    fn show_running(&self, label: &str);
    fn show_finished(&self, label: &str);
    fn clear(&self);
}

/// Alarm sound and vibration.
pub trait SoundPort: Send + Sync {
    fn play_alarm(&self);
    fn stop_alarm(&self);
    /// Alternating off/on durations in milliseconds.
    fn vibrate(&self, pattern: &[u64]);
}

/// Non-persistent preferences, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    duration: AtomicU64,
    temp_duration: AtomicU64,
    running: AtomicBool,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(millis: u64) -> Self {
        let prefs = Self::default();
        prefs.duration.store(millis, Ordering::SeqCst);
        prefs
    }
}

impl PreferencePort for MemoryPreferences {
    fn duration(&self) -> u64 {
        self.duration.load(Ordering::SeqCst)
    }

    fn set_duration(&self, millis: u64) -> Result<()> {
        self.duration.store(millis, Ordering::SeqCst);
        Ok(())
    }

    fn temp_duration(&self) -> u64 {
        self.temp_duration.load(Ordering::SeqCst)
    }

    fn set_temp_duration(&self, millis: u64) -> Result<()> {
        self.temp_duration.store(millis, Ordering::SeqCst);
        Ok(())
    }

    fn running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn set_running(&self, running: bool) -> Result<()> {
        self.running.store(running, Ordering::SeqCst);
        Ok(())
    }
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl NotificationPort for LogNotifier {
    fn show_running(&self, label: &str) {
        tracing::debug!(label, "timer running");
    }

    fn show_finished(&self, label: &str) {
        tracing::info!(label, "time's up");
    }

    fn clear(&self) {
        tracing::debug!("notification cleared");
    }
}

/// Sound output that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSound;

impl SoundPort for LogSound {
    fn play_alarm(&self) {
        tracing::info!("alarm started");
    }

    fn stop_alarm(&self) {
        tracing::debug!("alarm stopped");
    }

    fn vibrate(&self, pattern: &[u64]) {
        tracing::debug!(?pattern, "vibrate");
    }
}
