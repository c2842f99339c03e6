//! Periodic callback scheduling.
//!
//! A [`ClockSource`] turns a callback into a repeating tick. Engines never talk
//! to tokio directly; they ask a clock for a [`ClockHandle`] and drop or cancel
//! it when they are done.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::TimerError;

/// Callback invoked on every tick. Returning `Break` ends the schedule.
pub type TickCallback = Box<dyn FnMut() -> ControlFlow<()> + Send + 'static>;

/// Source of periodic callbacks.
///
/// Callbacks registered through one handle run strictly one after another.
/// Implementations must never invoke the callback from inside `schedule`.
pub trait ClockSource: Send + Sync {
    /// Invoke `callback` after `delay`, then every `period`, until the
    /// returned handle is cancelled or the callback breaks.
    fn schedule(
        &self,
        delay: Duration,
        period: Duration,
        callback: TickCallback,
    ) -> Result<ClockHandle, TimerError>;
}

/// Registration of one periodic callback.
///
/// Dropping the handle cancels the schedule.
#[derive(Debug)]
pub struct ClockHandle {
    cancelled: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl ClockHandle {
    /// Build a handle around a spawned tick loop.
    pub fn new(cancelled: Arc<AtomicBool>, task: JoinHandle<()>) -> Self {
        Self {
            cancelled,
            task: Some(task),
        }
    }

    /// Stop delivering ticks. A tick that is already running may finish;
    /// no later tick is delivered. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// `true` until the handle is cancelled or its callback breaks.
    pub fn is_active(&self) -> bool {
        !self.cancelled.load(Ordering::SeqCst)
            && self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for ClockHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Clock backed by the tokio timer wheel.
///
/// Spawns onto whatever runtime is current at `schedule` time. Deadlines are
/// computed from the first scheduled instant, and late ticks are delivered in
/// a burst, so a countdown never accumulates lateness.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl TokioClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockSource for TokioClock {
    fn schedule(
        &self,
        delay: Duration,
        period: Duration,
        mut callback: TickCallback,
    ) -> Result<ClockHandle, TimerError> {
        if period.is_zero() {
            return Err(TimerError::Scheduling("period must be non-zero".into()));
        }
        let runtime = Handle::try_current().map_err(|e| TimerError::Scheduling(e.to_string()))?;
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let task = runtime.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + delay, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                ticker.tick().await;
                if flag.load(Ordering::SeqCst) {
                    break;
                }
                if callback().is_break() {
                    flag.store(true, Ordering::SeqCst);
                    break;
                }
            }
        });

        Ok(ClockHandle::new(cancelled, task))
    }
}
