use std::time::Duration;

use crate::outcome::ResponseOutcome;
use crate::palette::CueColor;

/// A cue currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct CueEvent {
    pub color: CueColor,
    pub started_at: Duration,
}

impl CueEvent {
    pub fn new(color: CueColor, started_at: Duration) -> Self {
        Self { color, started_at }
    }

    /// Closes the event with its single outcome.
    pub fn close(self, outcome: ResponseOutcome, decided_at: Duration) -> CueRecord {
        CueRecord {
            color: self.color,
            outcome,
            started_at: self.started_at,
            decided_at,
        }
    }
}

/// Summary of a finished cue window.
#[derive(Debug, Clone, PartialEq)]
pub struct CueRecord {
    pub color: CueColor,
    pub outcome: ResponseOutcome,
    pub started_at: Duration,
    pub decided_at: Duration,
}

impl CueRecord {
    /// Time from cue onset to the deciding poll tick.
    pub fn reaction_time(&self) -> Duration {
        self.decided_at.saturating_sub(self.started_at)
    }
}
