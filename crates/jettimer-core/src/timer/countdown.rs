//! Countdown engine.
//!
//! Decrements a running counter by a fixed step on every clock tick. The
//! emitted value is the counter itself, so tick resolution is exactly the
//! step and no rounding creeps in.

use std::ops::ControlFlow;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::clock::{ClockHandle, ClockSource};
use crate::error::TimerError;

/// Default decrement step in milliseconds.
pub const DEFAULT_STEP_MS: u64 = 100;

/// One decrement of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEvent {
    pub remaining_ms: u64,
}

/// Drives a single countdown towards zero.
#[derive(Debug)]
pub struct CountdownEngine {
    step_ms: u64,
    handle: Option<ClockHandle>,
}

impl CountdownEngine {
    pub fn new(step_ms: u64) -> Self {
        Self {
            step_ms: step_ms.max(1),
            handle: None,
        }
    }

    pub fn step_ms(&self) -> u64 {
        self.step_ms
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(ClockHandle::is_active)
    }

    /// Start counting down from `initial_ms`.
    ///
    /// `on_tick` receives `initial - step`, `initial - 2*step`, ... and a final
    /// `0` exactly once; the schedule ends after the zero.
    ///
    /// # Errors
    /// `InvalidDuration` for a zero start value, `DoubleActivation` if the
    /// previous countdown was not stopped, or the clock's scheduling error.
    pub fn start<F>(
        &mut self,
        clock: &dyn ClockSource,
        initial_ms: u64,
        mut on_tick: F,
    ) -> Result<(), TimerError>
    where
        F: FnMut(TickEvent) + Send + 'static,
    {
        if initial_ms == 0 {
            return Err(TimerError::InvalidDuration { millis: initial_ms });
        }
        if self.is_active() {
            return Err(TimerError::DoubleActivation { engine: "countdown" });
        }

        let step = self.step_ms;
        let period = Duration::from_millis(step);
        let mut remaining = initial_ms;
        let handle = clock.schedule(
            period,
            period,
            Box::new(move || {
                remaining = remaining.saturating_sub(step);
                on_tick(TickEvent {
                    remaining_ms: remaining,
                });
                if remaining == 0 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }),
        )?;
        self.handle = Some(handle);
        Ok(())
    }

    /// Cancel the countdown. No-op when idle or already finished.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_MS)
    }
}
