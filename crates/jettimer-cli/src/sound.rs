use std::io::Write;

use jettimer_core::SoundPort;

/// Rings the terminal bell when the timer finishes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl SoundPort for TerminalBell {
    fn play_alarm(&self) {
        let mut stderr = std::io::stderr();
        if let Err(e) = stderr.write_all(b"\x07").and_then(|()| stderr.flush()) {
            tracing::debug!(error = %e, "failed to ring terminal bell");
        }
    }

    fn stop_alarm(&self) {}

    fn vibrate(&self, pattern: &[u64]) {
        tracing::trace!(?pattern, "no vibration motor on a terminal");
    }
}
