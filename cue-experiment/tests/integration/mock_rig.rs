//! Recording port doubles for driving the state machine on a virtual clock.
//!
//! Inputs follow a script of time ranges; every output call is stored with
//! the virtual timestamp it happened at.

use std::ops::Range;
use std::time::Duration;

use cue_core::{
    AudioCue, CueColor, CueDisplay, CuePalette, InputLine, OutputLine, ResponseKind,
    ResponseReporter, RigError, SignalPins, StopSignal,
};
use cue_experiment::{InteractionStateMachine, RigConfig, RigPorts};
use cue_timing::{Timer, VirtualTimer};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

pub fn ms(m: u64) -> Duration {
    Duration::from_millis(m)
}

// ── Pins ──────────────────────────────────────────────────────

pub struct ScriptedPins {
    timer: VirtualTimer,
    script: Vec<(InputLine, Range<Duration>)>,
    pub motor_writes: Vec<(Duration, bool)>,
    pub released: usize,
    /// Reads fail once the clock passes this point.
    pub fail_reads_from: Option<Duration>,
}

#[allow(dead_code)]
impl ScriptedPins {
    pub fn new(timer: VirtualTimer) -> Self {
        Self {
            timer,
            script: Vec::new(),
            motor_writes: Vec::new(),
            released: 0,
            fail_reads_from: None,
        }
    }

    pub fn active(mut self, line: InputLine, during: Range<Duration>) -> Self {
        self.script.push((line, during));
        self
    }

    /// Completed high→low motor pulses as (start, length).
    pub fn pulses(&self) -> Vec<(Duration, Duration)> {
        let mut out = Vec::new();
        let mut high_since = None;
        for &(at, high) in &self.motor_writes {
            match (high, high_since) {
                (true, None) => high_since = Some(at),
                (false, Some(start)) => {
                    out.push((start, at - start));
                    high_since = None;
                }
                _ => {}
            }
        }
        out
    }

    pub fn motor_is_low(&self) -> bool {
        self.motor_writes.last().is_none_or(|&(_, high)| !high)
    }
}

impl SignalPins for ScriptedPins {
    fn read(&mut self, line: InputLine) -> Result<bool, RigError> {
        let now = self.timer.now();
        if self.fail_reads_from.is_some_and(|at| now >= at) {
            return Err(RigError::hardware(format!("{line} read failed")));
        }
        Ok(self
            .script
            .iter()
            .any(|(l, during)| *l == line && during.contains(&now)))
    }

    fn write(&mut self, _line: OutputLine, high: bool) -> Result<(), RigError> {
        self.motor_writes.push((self.timer.now(), high));
        Ok(())
    }

    fn release(&mut self) -> Result<(), RigError> {
        self.released += 1;
        self.write(OutputLine::Motor, false)
    }
}

// ── Display ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    Cue(CueColor),
    Neutral,
}

pub struct RecordingDisplay {
    timer: VirtualTimer,
    pub frames: Vec<(Duration, Frame)>,
    pub pumps: usize,
}

#[allow(dead_code)]
impl RecordingDisplay {
    pub fn new(timer: VirtualTimer) -> Self {
        Self {
            timer,
            frames: Vec::new(),
            pumps: 0,
        }
    }

    pub fn current(&self) -> Option<Frame> {
        self.frames.last().map(|&(_, f)| f)
    }

    pub fn cues_shown(&self) -> Vec<CueColor> {
        self.frames
            .iter()
            .filter_map(|&(_, f)| match f {
                Frame::Cue(c) => Some(c),
                Frame::Neutral => None,
            })
            .collect()
    }
}

impl CueDisplay for RecordingDisplay {
    fn show(&mut self, color: CueColor) -> Result<(), RigError> {
        self.frames.push((self.timer.now(), Frame::Cue(color)));
        Ok(())
    }

    fn show_default(&mut self) -> Result<(), RigError> {
        self.frames.push((self.timer.now(), Frame::Neutral));
        Ok(())
    }

    fn pump_events(&mut self) -> Result<(), RigError> {
        self.pumps += 1;
        Ok(())
    }
}

// ── Audio ─────────────────────────────────────────────────────

pub struct CountingAudio {
    timer: VirtualTimer,
    clip: Duration,
    pub plays: Vec<Duration>,
}

impl CountingAudio {
    pub fn new(timer: VirtualTimer, clip: Duration) -> Self {
        Self {
            timer,
            clip,
            plays: Vec::new(),
        }
    }
}

impl AudioCue for CountingAudio {
    fn play_blocking(&mut self) -> Result<(), RigError> {
        self.plays.push(self.timer.now());
        self.timer.sleep(self.clip);
        Ok(())
    }
}

// ── Reporter ──────────────────────────────────────────────────

pub struct RecordingReporter {
    timer: VirtualTimer,
    pub delivers: bool,
    pub reports: Vec<(String, ResponseKind, Duration)>,
}

impl RecordingReporter {
    pub fn new(timer: VirtualTimer) -> Self {
        Self {
            timer,
            delivers: true,
            reports: Vec::new(),
        }
    }
}

impl ResponseReporter for RecordingReporter {
    fn report(&mut self, cow_id: &str, kind: ResponseKind) -> bool {
        self.reports
            .push((cow_id.to_string(), kind, self.timer.now()));
        self.delivers
    }
}

// ── Stop ──────────────────────────────────────────────────────

/// Requests a stop once the virtual clock reaches `at`.
pub struct DeadlineStop {
    timer: VirtualTimer,
    at: Duration,
}

impl DeadlineStop {
    pub fn at(timer: VirtualTimer, at: Duration) -> Self {
        Self { timer, at }
    }

    pub fn never(timer: VirtualTimer) -> Self {
        Self::at(timer, Duration::MAX)
    }
}

impl StopSignal for DeadlineStop {
    fn stop_requested(&self) -> bool {
        self.timer.now() >= self.at
    }
}

// ── Assembly ──────────────────────────────────────────────────

pub type MockRig = InteractionStateMachine<
    ScriptedPins,
    RecordingDisplay,
    CountingAudio,
    RecordingReporter,
    DeadlineStop,
    VirtualTimer,
    StdRng,
>;

pub const CLIP: Duration = Duration::from_secs(2);

pub fn build_rig(timer: &VirtualTimer, pins: ScriptedPins, stop: DeadlineStop, seed: u64) -> MockRig {
    let ports = RigPorts {
        pins,
        display: RecordingDisplay::new(timer.clone()),
        audio: CountingAudio::new(timer.clone(), CLIP),
        reporter: RecordingReporter::new(timer.clone()),
        stop,
    };
    InteractionStateMachine::new(
        RigConfig::default(),
        CuePalette::default(),
        ports,
        timer.clone(),
        StdRng::seed_from_u64(seed),
    )
}
