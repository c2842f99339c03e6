//! Timer coordinator.
//!
//! Owns the run state and remaining time of the single timer and switches
//! between the countdown and blink engines so that at most one is live.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped --start--> Started --pause--> Paused --resume--> Started
//! Started --tick 0--> Finished --add_minute--> Started
//! any --reset--> Stopped
//! ```
//!
//! ## Epoch guard
//!
//! Every engine switch bumps an epoch counter. Engine callbacks carry the
//! epoch they were started with and are dropped when it no longer matches,
//! so a tick that was already in flight when an engine was stopped can never
//! touch the state afterwards.
//!
//! ## Usage
//!
//! ```ignore
//! let timer = TimerCoordinator::new(TimerSettings::default(), clock, ports);
//! timer.configure(5_000)?;
//! let mut events = timer.subscribe();
//! timer.start()?;
//! while let Ok(event) = events.recv().await { /* ... */ }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::blink::{BlinkEngine, BlinkEvent, DEFAULT_BLINK_PERIOD_MS};
use super::clock::ClockSource;
use super::countdown::{CountdownEngine, TickEvent, DEFAULT_STEP_MS};
use super::format::{format_hms, is_second_boundary};
use crate::error::{CoreError, TimerError};
use crate::events::Event;
use crate::ports::{LogNotifier, LogSound, NotificationPort, PreferencePort, SoundPort};

/// Length of the "+1 minute" action.
pub const ONE_MINUTE_MS: u64 = 60_000;

const DEFAULT_VIBRATION_PATTERN: [u64; 4] = [130, 130, 130, 130];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Stopped,
    Started,
    Paused,
    Finished,
}

/// Which engine currently holds a clock registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveEngine {
    None,
    Countdown,
    Blink,
}

/// Tunables for a coordinator instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSettings {
    /// Countdown decrement per tick.
    pub step_ms: u64,
    /// Interval between blink flips.
    pub blink_period_ms: u64,
    /// Vibration played when the timer finishes.
    pub vibration_pattern: Vec<u64>,
    /// Buffered events per subscriber before it starts lagging.
    pub event_capacity: usize,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            step_ms: DEFAULT_STEP_MS,
            blink_period_ms: DEFAULT_BLINK_PERIOD_MS,
            vibration_pattern: DEFAULT_VIBRATION_PATTERN.to_vec(),
            event_capacity: 256,
        }
    }
}

/// External collaborators of the coordinator.
#[derive(Clone)]
pub struct Ports {
    pub preferences: Arc<dyn PreferencePort>,
    pub notifier: Arc<dyn NotificationPort>,
    pub sound: Arc<dyn SoundPort>,
}

impl Ports {
    /// Logging notifier and sound around the given preference store.
    pub fn new(preferences: Arc<dyn PreferencePort>) -> Self {
        Self {
            preferences,
            notifier: Arc::new(LogNotifier),
            sound: Arc::new(LogSound),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationPort>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_sound(mut self, sound: Arc<dyn SoundPort>) -> Self {
        self.sound = sound;
        self
    }
}

/// What should be scheduled after a transition.
#[derive(Debug, Clone, Copy)]
enum Activation {
    Idle,
    Countdown(u64),
    Blink,
}

struct Inner {
    state: RunState,
    remaining_ms: u64,
    /// Total the current run counts against; grows with `add_minute`.
    captured_ms: u64,
    label: String,
    visible: bool,
    epoch: u64,
    countdown: CountdownEngine,
    blink: BlinkEngine,
}

impl Inner {
    fn activation(&self) -> Activation {
        match self.state {
            RunState::Stopped => Activation::Idle,
            RunState::Started => Activation::Countdown(self.remaining_ms),
            RunState::Paused | RunState::Finished => Activation::Blink,
        }
    }

    fn active_engine(&self) -> ActiveEngine {
        let countdown = self.countdown.is_active();
        let blink = self.blink.is_active();
        debug_assert!(!(countdown && blink), "both engines active");
        match (countdown, blink) {
            (true, _) => ActiveEngine::Countdown,
            (false, true) => ActiveEngine::Blink,
            (false, false) => ActiveEngine::None,
        }
    }
}

struct Shared {
    clock: Arc<dyn ClockSource>,
    ports: Ports,
    settings: TimerSettings,
    events: broadcast::Sender<Event>,
    inner: Mutex<Inner>,
}

/// Single-timer state machine.
///
/// Cheap to clone; clones drive the same timer.
#[derive(Clone)]
pub struct TimerCoordinator {
    shared: Arc<Shared>,
}

impl TimerCoordinator {
    /// Create a stopped coordinator.
    pub fn new(settings: TimerSettings, clock: Arc<dyn ClockSource>, ports: Ports) -> Self {
        let (events, _) = broadcast::channel(settings.event_capacity.max(1));
        let label = format_hms(ports.preferences.duration());
        let inner = Inner {
            state: RunState::Stopped,
            remaining_ms: 0,
            captured_ms: 0,
            label,
            visible: true,
            epoch: 0,
            countdown: CountdownEngine::new(settings.step_ms),
            blink: BlinkEngine::new(settings.blink_period_ms),
        };
        Self {
            shared: Arc::new(Shared {
                clock,
                ports,
                settings,
                events,
                inner: Mutex::new(inner),
            }),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> RunState {
        self.shared.lock().state
    }

    pub fn remaining_ms(&self) -> u64 {
        self.shared.lock().remaining_ms
    }

    /// Total the current run counts against (the "temp duration").
    pub fn captured_ms(&self) -> u64 {
        self.shared.lock().captured_ms
    }

    /// Configured timer length.
    pub fn duration_ms(&self) -> u64 {
        self.shared.ports.preferences.duration()
    }

    pub fn label(&self) -> String {
        self.shared.lock().label.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.shared.lock().visible
    }

    pub fn active_engine(&self) -> ActiveEngine {
        self.shared.lock().active_engine()
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.shared.settings
    }

    /// Receive every event emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.events.subscribe()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let inner = self.shared.lock();
        Event::StateSnapshot {
            state: inner.state,
            active_engine: inner.active_engine(),
            duration_ms: self.shared.ports.preferences.duration(),
            captured_ms: inner.captured_ms,
            remaining_ms: inner.remaining_ms,
            label: inner.label.clone(),
            visible: inner.visible,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Store the length of the next timer. Only allowed while stopped.
    ///
    /// # Errors
    /// `InvalidState` unless stopped, `InvalidDuration` for zero, or the
    /// preference store's write error.
    pub fn configure(&self, duration_ms: u64) -> Result<(), CoreError> {
        let mut inner = self.shared.lock();
        if inner.state != RunState::Stopped {
            return Err(TimerError::InvalidState {
                operation: "configure",
                state: inner.state,
            }
            .into());
        }
        if duration_ms == 0 {
            return Err(TimerError::InvalidDuration { millis: 0 }.into());
        }
        let prefs = &self.shared.ports.preferences;
        prefs.set_duration(duration_ms)?;
        prefs.set_temp_duration(0)?;
        inner.label = format_hms(duration_ms);
        tracing::debug!(duration_ms, "timer configured");
        Ok(())
    }

    pub fn start(&self) -> Result<Event, TimerError> {
        let mut inner = self.shared.lock();
        self.shared.start(&mut inner)
    }

    pub fn pause(&self) -> Result<Event, TimerError> {
        let mut inner = self.shared.lock();
        self.shared.pause(&mut inner)
    }

    pub fn resume(&self) -> Result<Event, TimerError> {
        let mut inner = self.shared.lock();
        self.shared.resume(&mut inner)
    }

    /// Add one minute to a running or finished timer. While paused or
    /// stopped this resets the timer instead.
    ///
    /// The time already elapsed against the captured total is carried into
    /// the new total, so the countdown continues from the last tick plus one
    /// minute.
    ///
    /// # Errors
    /// `InvalidDuration` when the new total does not fit in a `u64`; the
    /// timer is left as it was.
    pub fn add_minute(&self) -> Result<Event, TimerError> {
        let mut inner = self.shared.lock();
        self.shared.add_minute(&mut inner)
    }

    /// Stop everything and forget the configured duration.
    pub fn reset(&self) -> Event {
        let mut inner = self.shared.lock();
        self.shared.reset(&mut inner)
    }

    /// The primary action button: start, pause, resume or dismiss depending
    /// on the current state.
    pub fn toggle(&self) -> Result<Event, TimerError> {
        let mut inner = self.shared.lock();
        self.shared.toggle(&mut inner)
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start(self: &Arc<Self>, inner: &mut Inner) -> Result<Event, TimerError> {
        if inner.state != RunState::Stopped {
            return Err(TimerError::InvalidState {
                operation: "start",
                state: inner.state,
            });
        }
        let prefs = &self.ports.preferences;
        let captured = prefs.temp_duration().max(prefs.duration());
        if captured == 0 {
            return Err(TimerError::InvalidDuration { millis: 0 });
        }

        self.switch(inner, Activation::Countdown(captured))?;
        inner.state = RunState::Started;
        inner.remaining_ms = captured;
        inner.captured_ms = captured;
        inner.visible = true;
        inner.label = format_hms(captured);
        self.persist_temp(captured);
        self.persist_running(true);
        self.ports.notifier.show_running(&inner.label);
        tracing::debug!(remaining_ms = captured, "timer started");

        Ok(self.emit(Event::TimerStarted {
            remaining_ms: captured,
            at: Utc::now(),
        }))
    }

    fn pause(self: &Arc<Self>, inner: &mut Inner) -> Result<Event, TimerError> {
        if inner.state != RunState::Started {
            return Err(TimerError::InvalidState {
                operation: "pause",
                state: inner.state,
            });
        }

        self.switch(inner, Activation::Blink)?;
        inner.state = RunState::Paused;
        self.persist_running(false);
        tracing::debug!(remaining_ms = inner.remaining_ms, "timer paused");

        Ok(self.emit(Event::TimerPaused {
            remaining_ms: inner.remaining_ms,
            at: Utc::now(),
        }))
    }

    fn resume(self: &Arc<Self>, inner: &mut Inner) -> Result<Event, TimerError> {
        if inner.state != RunState::Paused {
            return Err(TimerError::InvalidState {
                operation: "resume",
                state: inner.state,
            });
        }

        let from = inner.remaining_ms;
        self.switch(inner, Activation::Countdown(from))?;
        inner.state = RunState::Started;
        inner.visible = true;
        inner.label = format_hms(from);
        self.persist_running(true);
        tracing::debug!(remaining_ms = from, "timer resumed");

        Ok(self.emit(Event::TimerResumed {
            remaining_ms: from,
            at: Utc::now(),
        }))
    }

    fn add_minute(self: &Arc<Self>, inner: &mut Inner) -> Result<Event, TimerError> {
        let was_finished = match inner.state {
            RunState::Started => false,
            RunState::Finished => true,
            RunState::Paused | RunState::Stopped => return Ok(self.reset(inner)),
        };

        let remaining = inner.remaining_ms;
        let elapsed = if remaining > 0 {
            inner.captured_ms.saturating_sub(remaining)
        } else {
            0
        };
        let captured = remaining
            .checked_add(ONE_MINUTE_MS)
            .and_then(|total| total.checked_add(elapsed))
            .ok_or(TimerError::InvalidDuration { millis: remaining })?;
        let from = captured - elapsed;

        self.switch(inner, Activation::Countdown(from))?;
        if was_finished {
            self.ports.sound.stop_alarm();
            self.persist_running(true);
        }
        inner.state = RunState::Started;
        inner.remaining_ms = from;
        inner.captured_ms = captured;
        inner.visible = true;
        inner.label = format_hms(from);
        self.persist_temp(captured);
        self.ports.notifier.show_running(&inner.label);
        tracing::debug!(remaining_ms = from, captured_ms = captured, "minute added");

        Ok(self.emit(Event::MinuteAdded {
            remaining_ms: from,
            captured_ms: captured,
            at: Utc::now(),
        }))
    }

    fn toggle(self: &Arc<Self>, inner: &mut Inner) -> Result<Event, TimerError> {
        match inner.state {
            RunState::Stopped => self.start(inner),
            RunState::Started => self.pause(inner),
            RunState::Paused => self.resume(inner),
            RunState::Finished => Ok(self.reset(inner)),
        }
    }

    fn emit(&self, event: Event) -> Event {
        // No subscribers is fine.
        let _ = self.events.send(event.clone());
        event
    }

    fn persist_temp(&self, millis: u64) {
        if let Err(e) = self.ports.preferences.set_temp_duration(millis) {
            tracing::warn!(error = %e, "failed to persist temp duration");
        }
    }

    fn persist_running(&self, running: bool) {
        if let Err(e) = self.ports.preferences.set_running(running) {
            tracing::warn!(error = %e, "failed to persist running flag");
        }
    }

    fn deactivate(&self, inner: &mut Inner) {
        inner.countdown.stop();
        inner.blink.stop();
        inner.epoch = inner.epoch.wrapping_add(1);
    }

    fn activate(self: &Arc<Self>, inner: &mut Inner, next: Activation) -> Result<(), TimerError> {
        let epoch = inner.epoch;
        let weak = Arc::downgrade(self);
        match next {
            Activation::Idle => Ok(()),
            Activation::Countdown(from) => {
                inner
                    .countdown
                    .start(self.clock.as_ref(), from, move |tick: TickEvent| {
                        if let Some(shared) = weak.upgrade() {
                            shared.on_tick(epoch, tick);
                        }
                    })
            }
            Activation::Blink => inner.blink.start(self.clock.as_ref(), move |blink: BlinkEvent| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_blink(epoch, blink);
                }
            }),
        }
    }

    /// Stop the live engine, then start `next`. On failure the previous
    /// engine is restarted and the error returned.
    fn switch(self: &Arc<Self>, inner: &mut Inner, next: Activation) -> Result<(), TimerError> {
        let previous = inner.activation();
        self.deactivate(inner);
        if let Err(err) = self.activate(inner, next) {
            tracing::warn!(error = %err, ?next, "engine activation failed");
            if let Err(rollback) = self.activate(inner, previous) {
                tracing::warn!(error = %rollback, ?previous, "failed to restore previous engine");
            }
            return Err(err);
        }
        Ok(())
    }

    fn reset(&self, inner: &mut Inner) -> Event {
        self.deactivate(inner);
        inner.state = RunState::Stopped;
        inner.remaining_ms = 0;
        inner.captured_ms = 0;
        inner.visible = true;
        inner.label = format_hms(0);
        for (what, result) in [
            ("duration", self.ports.preferences.set_duration(0)),
            ("temp duration", self.ports.preferences.set_temp_duration(0)),
            ("running flag", self.ports.preferences.set_running(false)),
        ] {
            if let Err(e) = result {
                tracing::warn!(error = %e, "failed to clear {what}");
            }
        }
        self.ports.sound.stop_alarm();
        self.ports.notifier.clear();
        tracing::debug!("timer reset");
        self.emit(Event::TimerReset { at: Utc::now() })
    }

    fn on_tick(self: &Arc<Self>, epoch: u64, tick: TickEvent) {
        let mut inner = self.lock();
        if inner.epoch != epoch || inner.state != RunState::Started {
            return;
        }

        inner.remaining_ms = tick.remaining_ms;
        let label = is_second_boundary(tick.remaining_ms).then(|| format_hms(tick.remaining_ms));
        if let Some(label) = &label {
            inner.label = label.clone();
            if tick.remaining_ms > 0 {
                self.ports.notifier.show_running(label);
            }
        }
        self.emit(Event::Tick {
            remaining_ms: tick.remaining_ms,
            label,
            at: Utc::now(),
        });

        if tick.remaining_ms == 0 {
            self.finish(&mut inner);
        }
    }

    fn finish(self: &Arc<Self>, inner: &mut Inner) {
        if inner.state == RunState::Finished {
            return;
        }
        self.deactivate(inner);
        if let Err(e) = self.activate(inner, Activation::Blink) {
            tracing::warn!(error = %e, "blink unavailable for finished timer");
        }
        inner.state = RunState::Finished;
        inner.remaining_ms = 0;
        inner.label = format_hms(0);

        self.ports.sound.play_alarm();
        self.ports.sound.vibrate(&self.settings.vibration_pattern);
        self.ports.notifier.show_finished(&inner.label);
        self.persist_running(false);
        tracing::debug!("timer finished");

        self.emit(Event::TimerFinished {
            label: inner.label.clone(),
            at: Utc::now(),
        });
    }

    fn on_blink(&self, epoch: u64, blink: BlinkEvent) {
        let mut inner = self.lock();
        if inner.epoch != epoch || !matches!(inner.state, RunState::Paused | RunState::Finished) {
            return;
        }
        inner.visible = blink.visible;
        self.emit(Event::Blink {
            visible: blink.visible,
            at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MemoryPreferences;
    use crate::timer::clock::{ClockHandle, TickCallback, TokioClock};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time;

    /// Tokio clock that can be told to reject the next registration.
    #[derive(Default)]
    struct FlakyClock {
        inner: TokioClock,
        fail_next: AtomicBool,
    }

    impl ClockSource for FlakyClock {
        fn schedule(
            &self,
            delay: Duration,
            period: Duration,
            callback: TickCallback,
        ) -> Result<ClockHandle, TimerError> {
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(TimerError::Scheduling("no timer slots".into()));
            }
            self.inner.schedule(delay, period, callback)
        }
    }

    fn coordinator(duration_ms: u64, clock: Arc<dyn ClockSource>) -> TimerCoordinator {
        let settings = TimerSettings {
            step_ms: 1_000,
            ..TimerSettings::default()
        };
        let prefs = Arc::new(MemoryPreferences::with_duration(duration_ms));
        TimerCoordinator::new(settings, clock, Ports::new(prefs))
    }

    fn assert_exclusive(timer: &TimerCoordinator) {
        let inner = timer.shared.lock();
        assert!(!(inner.countdown.is_active() && inner.blink.is_active()));
        let expected = match inner.state {
            RunState::Stopped => ActiveEngine::None,
            RunState::Started => ActiveEngine::Countdown,
            RunState::Paused | RunState::Finished => ActiveEngine::Blink,
        };
        assert_eq!(inner.active_engine(), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn engines_are_mutually_exclusive_through_lifecycle() {
        let timer = coordinator(3_000, Arc::new(TokioClock::new()));
        assert_exclusive(&timer);

        timer.start().unwrap();
        assert_exclusive(&timer);
        time::sleep(Duration::from_millis(1_100)).await;
        timer.pause().unwrap();
        assert_exclusive(&timer);
        time::sleep(Duration::from_millis(700)).await;
        timer.resume().unwrap();
        assert_exclusive(&timer);
        time::sleep(Duration::from_millis(2_100)).await;
        assert_eq!(timer.state(), RunState::Finished);
        assert_exclusive(&timer);
        timer.add_minute().unwrap();
        assert_exclusive(&timer);
        timer.reset();
        assert_exclusive(&timer);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_epoch_ticks_are_ignored() {
        let timer = coordinator(10_000, Arc::new(TokioClock::new()));
        timer.start().unwrap();
        let stale = timer.shared.lock().epoch;

        timer.pause().unwrap();
        timer.shared.on_tick(stale, TickEvent { remaining_ms: 0 });
        assert_eq!(timer.state(), RunState::Paused);
        assert_eq!(timer.remaining_ms(), 10_000);

        timer.resume().unwrap();
        timer.shared.on_tick(stale, TickEvent { remaining_ms: 1_000 });
        assert_eq!(timer.remaining_ms(), 10_000);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_pause_keeps_countdown_running() {
        let clock = Arc::new(FlakyClock::default());
        let timer = coordinator(10_000, clock.clone());
        timer.start().unwrap();
        time::sleep(Duration::from_millis(1_100)).await;

        clock.fail_next.store(true, Ordering::SeqCst);
        let err = timer.pause().unwrap_err();
        assert!(matches!(err, TimerError::Scheduling(_)));
        assert_eq!(timer.state(), RunState::Started);
        assert_eq!(timer.remaining_ms(), 9_000);
        assert_eq!(timer.active_engine(), ActiveEngine::Countdown);

        time::sleep(Duration::from_millis(1_050)).await;
        assert_eq!(timer.remaining_ms(), 8_000);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_start_stays_stopped() {
        let clock = Arc::new(FlakyClock::default());
        let timer = coordinator(10_000, clock.clone());
        clock.fail_next.store(true, Ordering::SeqCst);

        assert!(timer.start().is_err());
        assert_eq!(timer.state(), RunState::Stopped);
        assert_eq!(timer.remaining_ms(), 0);
        assert_eq!(timer.active_engine(), ActiveEngine::None);
        assert!(!timer.shared.ports.preferences.running());
    }

    /// Counts `stop_alarm` calls.
    #[derive(Default)]
    struct AlarmCounter {
        stops: AtomicUsize,
    }

    impl SoundPort for AlarmCounter {
        fn play_alarm(&self) {}

        fn stop_alarm(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }

        fn vibrate(&self, _pattern: &[u64]) {}
    }

    #[tokio::test(start_paused = true)]
    async fn failed_add_minute_keeps_finished_timer_blinking() {
        let clock = Arc::new(FlakyClock::default());
        let sound = Arc::new(AlarmCounter::default());
        let prefs = Arc::new(MemoryPreferences::with_duration(1_000));
        let settings = TimerSettings {
            step_ms: 1_000,
            ..TimerSettings::default()
        };
        let timer = TimerCoordinator::new(
            settings,
            clock.clone(),
            Ports::new(prefs).with_sound(sound.clone()),
        );
        timer.start().unwrap();
        time::sleep(Duration::from_millis(1_100)).await;
        assert_eq!(timer.state(), RunState::Finished);

        clock.fail_next.store(true, Ordering::SeqCst);
        let err = timer.add_minute().unwrap_err();
        assert!(matches!(err, TimerError::Scheduling(_)));
        assert_eq!(timer.state(), RunState::Finished);
        assert_eq!(timer.remaining_ms(), 0);
        assert_eq!(timer.active_engine(), ActiveEngine::Blink);
        assert_eq!(sound.stops.load(Ordering::SeqCst), 0);
        assert!(!timer.shared.ports.preferences.running());
    }

    #[tokio::test(start_paused = true)]
    async fn add_minute_overflow_leaves_timer_untouched() {
        let timer = coordinator(u64::MAX - 1_000, Arc::new(TokioClock::new()));
        timer.start().unwrap();

        assert_eq!(
            timer.add_minute().unwrap_err(),
            TimerError::InvalidDuration {
                millis: u64::MAX - 1_000
            }
        );
        assert_eq!(timer.state(), RunState::Started);
        assert_eq!(timer.remaining_ms(), u64::MAX - 1_000);
        assert_eq!(timer.captured_ms(), u64::MAX - 1_000);
        assert_eq!(timer.active_engine(), ActiveEngine::Countdown);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_dispatches_on_the_state_it_locked() {
        let timer = coordinator(5_000, Arc::new(TokioClock::new()));
        timer.start().unwrap();

        // A final tick landing just before the toggle must make it dismiss.
        let mut inner = timer.shared.lock();
        timer.shared.finish(&mut inner);
        let event = timer.shared.toggle(&mut inner).unwrap();
        drop(inner);

        assert!(matches!(event, Event::TimerReset { .. }));
        assert_eq!(timer.state(), RunState::Stopped);
        assert_eq!(timer.active_engine(), ActiveEngine::None);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_walks_the_primary_action() {
        let timer = coordinator(2_000, Arc::new(TokioClock::new()));
        timer.toggle().unwrap();
        assert_eq!(timer.state(), RunState::Started);
        timer.toggle().unwrap();
        assert_eq!(timer.state(), RunState::Paused);
        timer.toggle().unwrap();
        assert_eq!(timer.state(), RunState::Started);

        time::sleep(Duration::from_millis(2_100)).await;
        assert_eq!(timer.state(), RunState::Finished);
        timer.toggle().unwrap();
        assert_eq!(timer.state(), RunState::Stopped);
    }

    #[test]
    fn commands_in_wrong_state_are_rejected() {
        let timer = coordinator(2_000, Arc::new(TokioClock::new()));
        assert_eq!(
            timer.pause().unwrap_err(),
            TimerError::InvalidState {
                operation: "pause",
                state: RunState::Stopped
            }
        );
        assert!(matches!(
            timer.resume(),
            Err(TimerError::InvalidState { operation: "resume", .. })
        ));
    }

    #[test]
    fn start_without_runtime_reports_scheduling_error() {
        let timer = coordinator(2_000, Arc::new(TokioClock::new()));
        assert!(matches!(timer.start(), Err(TimerError::Scheduling(_))));
        assert_eq!(timer.state(), RunState::Stopped);
    }
}
