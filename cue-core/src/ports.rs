//! Boundary traits between the interaction loop and the outside world.
//!
//! The state machine is generic over these, so it never touches GPIO,
//! windows, audio devices or the network directly. Every call is
//! synchronous: a motor pulse or a clip playback blocks the loop until it
//! finishes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cue_timing::Timer;

use crate::error::RigError;
use crate::outcome::ResponseKind;
use crate::palette::CueColor;
use crate::signal::{InputLine, OutputLine};

/// Digital lines: three inputs and the motor output.
///
/// No debouncing happens here; the caller's poll interval does that.
pub trait SignalPins {
    fn read(&mut self, line: InputLine) -> Result<bool, RigError>;

    fn write(&mut self, line: OutputLine, high: bool) -> Result<(), RigError>;

    /// Drives `line` high for `duration`, then low again.
    fn pulse<T: Timer>(
        &mut self,
        line: OutputLine,
        duration: Duration,
        timer: &T,
    ) -> Result<(), RigError> {
        self.write(line, true)?;
        timer.sleep(duration);
        self.write(line, false)
    }

    /// Drives every output low. Must be safe to call repeatedly and after
    /// a failed write.
    fn release(&mut self) -> Result<(), RigError>;
}

/// Full-screen solid color output.
pub trait CueDisplay {
    fn show(&mut self, color: CueColor) -> Result<(), RigError>;

    /// Restores the neutral screen. Idempotent.
    fn show_default(&mut self) -> Result<(), RigError>;

    /// Processes pending window events (key presses, close requests).
    /// Called once per poll tick.
    fn pump_events(&mut self) -> Result<(), RigError> {
        Ok(())
    }
}

/// The periodic audio cue.
pub trait AudioCue {
    /// Plays the clip and returns once playback has finished.
    fn play_blocking(&mut self) -> Result<(), RigError>;
}

/// Delivers a response to the collection endpoint.
///
/// Returns whether delivery succeeded; failures are the reporter's to log.
pub trait ResponseReporter {
    fn report(&mut self, cow_id: &str, kind: ResponseKind) -> bool;
}

/// Cooperative stop request, observed between poll ticks.
pub trait StopSignal {
    fn stop_requested(&self) -> bool;
}

/// Shared stop flag, set from a signal handler or a window key press.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl StopSignal for StopFlag {
    fn stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
