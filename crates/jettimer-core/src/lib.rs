//! # Jettimer Core Library
//!
//! This library provides the countdown engine behind Jettimer, a single-timer
//! app. The CLI binary drives it in a foreground tokio runtime; any other
//! front-end only needs to implement the ports and subscribe to events.
//!
//! ## Architecture
//!
//! - **Clock**: tokio-backed periodic callbacks with cancellable handles
//! - **Engines**: a countdown that decrements by a fixed step, and a blink
//!   signal used while the timer is paused or finished
//! - **Coordinator**: the state machine that owns the remaining time and keeps
//!   exactly one engine live
//! - **Storage**: SQLite key-value preferences and TOML configuration
//!
//! ## Key Components
//!
//! - [`TimerCoordinator`]: Start/pause/resume/+1 minute/reset
//! - [`PreferencePort`], [`NotificationPort`], [`SoundPort`]: External collaborators
//! - [`Config`]: Application configuration management
//! - [`Event`]: Everything observers can see

pub mod error;
pub mod events;
pub mod input;
pub mod ports;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, TimerError, ValidationError};
pub use events::Event;
pub use input::{parse_hhmmss, DurationInput};
pub use ports::{
    LogNotifier, LogSound, MemoryPreferences, NotificationPort, PreferencePort, SoundPort,
};
pub use storage::{Config, Database, SqlitePreferences};
pub use timer::{
    format_hms, ActiveEngine, ClockSource, Ports, RunState, TimerCoordinator, TimerSettings,
    TokioClock,
};
