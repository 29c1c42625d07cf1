use std::time::Duration;

use cue_timing::Timer;

/// Tracks time since the last audio cue finished.
#[derive(Debug, Clone)]
pub struct AudioCycleTimer {
    period: Duration,
    last_reset: Duration,
}

impl AudioCycleTimer {
    pub fn new<T: Timer>(period: Duration, timer: &T) -> Self {
        Self {
            period,
            last_reset: timer.now(),
        }
    }

    pub fn elapsed<T: Timer>(&self, timer: &T) -> Duration {
        timer.elapsed(self.last_reset)
    }

    pub fn is_due<T: Timer>(&self, timer: &T) -> bool {
        self.elapsed(timer) >= self.period
    }

    /// Restart the cycle from now. Call after playback has completed.
    pub fn reset<T: Timer>(&mut self, timer: &T) {
        self.last_reset = timer.now();
    }
}
