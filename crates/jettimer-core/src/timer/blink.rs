//! Blink engine: an alternating visibility signal for paused and finished timers.

use std::ops::ControlFlow;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::clock::{ClockHandle, ClockSource};
use crate::error::TimerError;

/// Default half-period of the blink in milliseconds.
pub const DEFAULT_BLINK_PERIOD_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlinkEvent {
    pub visible: bool,
}

#[derive(Debug)]
pub struct BlinkEngine {
    period_ms: u64,
    handle: Option<ClockHandle>,
}

impl BlinkEngine {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            handle: None,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(ClockHandle::is_active)
    }

    /// Emit `true` right away, then flip every period until [`stop`](Self::stop).
    pub fn start<F>(&mut self, clock: &dyn ClockSource, mut on_blink: F) -> Result<(), TimerError>
    where
        F: FnMut(BlinkEvent) + Send + 'static,
    {
        if self.is_active() {
            return Err(TimerError::DoubleActivation { engine: "blink" });
        }

        let mut visible = true;
        let handle = clock.schedule(
            Duration::ZERO,
            Duration::from_millis(self.period_ms),
            Box::new(move || {
                on_blink(BlinkEvent { visible });
                visible = !visible;
                ControlFlow::Continue(())
            }),
        )?;
        self.handle = Some(handle);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }
}

impl Default for BlinkEngine {
    fn default() -> Self {
        Self::new(DEFAULT_BLINK_PERIOD_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::clock::TokioClock;
    use std::sync::{Arc, Mutex};
    use tokio::time;

    #[tokio::test(start_paused = true)]
    async fn alternates_starting_visible() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut engine = BlinkEngine::new(500);
        engine
            .start(&TokioClock::new(), move |b: BlinkEvent| {
                sink.lock().unwrap().push(b.visible)
            })
            .unwrap();

        time::sleep(Duration::from_millis(1750)).await;
        assert_eq!(*seen.lock().unwrap(), vec![true, false, true, false]);
        assert!(engine.is_active());

        engine.stop();
        time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(seen.lock().unwrap().len(), 4);
        assert!(!engine.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_is_rejected() {
        let mut engine = BlinkEngine::default();
        let clock = TokioClock::new();
        engine.start(&clock, |_| {}).unwrap();
        assert_eq!(
            engine.start(&clock, |_| {}).unwrap_err(),
            TimerError::DoubleActivation { engine: "blink" }
        );

        engine.stop();
        engine.start(&clock, |_| {}).unwrap();
    }
}
