mod blink;
mod clock;
mod coordinator;
mod countdown;
mod format;

pub use blink::{BlinkEngine, BlinkEvent, DEFAULT_BLINK_PERIOD_MS};
pub use clock::{ClockHandle, ClockSource, TickCallback, TokioClock};
pub use coordinator::{ActiveEngine, Ports, RunState, TimerCoordinator, TimerSettings, ONE_MINUTE_MS};
pub use countdown::{CountdownEngine, TickEvent, DEFAULT_STEP_MS};
pub use format::{format_hms, is_second_boundary};
