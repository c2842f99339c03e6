use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{ActiveEngine, RunState};

/// Every state change of the coordinator produces an Event.
/// Observers receive them through [`TimerCoordinator::subscribe`](crate::TimerCoordinator::subscribe).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// One countdown decrement. `label` is only set on whole seconds.
    Tick {
        remaining_ms: u64,
        label: Option<String>,
        at: DateTime<Utc>,
    },
    Blink {
        visible: bool,
        at: DateTime<Utc>,
    },
    TimerFinished {
        label: String,
        at: DateTime<Utc>,
    },
    MinuteAdded {
        remaining_ms: u64,
        captured_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: RunState,
        active_engine: ActiveEngine,
        duration_ms: u64,
        captured_ms: u64,
        remaining_ms: u64,
        label: String,
        visible: bool,
        at: DateTime<Utc>,
    },
}
