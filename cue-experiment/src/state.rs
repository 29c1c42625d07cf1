use super::audio_cycle::AudioCycleTimer;
use super::config::RigConfig;
use cue_core::{
    AudioCue, CueDisplay, CueEvent, CuePalette, CueRecord, InputLine, OutputLine,
    ResponseOutcome, ResponseReporter, RigError, RigState, SignalPins, StopSignal,
};
use cue_timing::Timer;
use rand::Rng;
use tracing::{debug, error, info, warn};

/// Everything the loop talks to, bundled so it can be handed over in one go.
pub struct RigPorts<P, D, A, R, S> {
    pub pins: P,
    pub display: D,
    pub audio: A,
    pub reporter: R,
    pub stop: S,
}

/// Counters for one run, logged at shutdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub optimistic: usize,
    pub pessimistic: usize,
    pub timeouts: usize,
    pub failed_reports: usize,
    pub audio_cues: usize,
}

impl RunSummary {
    pub fn cues(&self) -> usize {
        self.optimistic + self.pessimistic + self.timeouts
    }

    fn record(&mut self, outcome: ResponseOutcome) {
        match outcome {
            ResponseOutcome::Optimistic => self.optimistic += 1,
            ResponseOutcome::Pessimistic => self.pessimistic += 1,
            ResponseOutcome::Timeout => self.timeouts += 1,
        }
    }
}

/// The cue-and-response loop.
///
/// Single-threaded: every port call blocks, and a stop request is only
/// seen between poll ticks.
pub struct InteractionStateMachine<P, D, A, R, S, T, G>
where
    P: SignalPins,
    D: CueDisplay,
    A: AudioCue,
    R: ResponseReporter,
    S: StopSignal,
    T: Timer,
    G: Rng,
{
    pub state: RigState,
    pub config: RigConfig,
    pub palette: CuePalette,
    pub ports: RigPorts<P, D, A, R, S>,
    pub timer: T,
    pub rng: G,
    pub audio_cycle: AudioCycleTimer,
    pub current: Option<CueEvent>,
    pub summary: RunSummary,
}

impl<P, D, A, R, S, T, G> InteractionStateMachine<P, D, A, R, S, T, G>
where
    P: SignalPins,
    D: CueDisplay,
    A: AudioCue,
    R: ResponseReporter,
    S: StopSignal,
    T: Timer,
    G: Rng,
{
    pub fn new(
        config: RigConfig,
        palette: CuePalette,
        ports: RigPorts<P, D, A, R, S>,
        timer: T,
        rng: G,
    ) -> Self {
        let audio_cycle = AudioCycleTimer::new(config.audio_period, &timer);
        Self {
            state: RigState::Idle,
            config,
            palette,
            ports,
            timer,
            rng,
            audio_cycle,
            current: None,
            summary: RunSummary::default(),
        }
    }

    /// Runs until a stop request or a fatal error. Outputs are released on
    /// both paths.
    pub fn run(&mut self) -> Result<RunSummary, RigError> {
        let result = self.run_until_stopped();
        self.shutdown();
        result.map(|()| self.summary.clone())
    }

    fn run_until_stopped(&mut self) -> Result<(), RigError> {
        self.start()?;
        while !self.state.is_terminating() {
            self.tick()?;
        }
        Ok(())
    }

    /// Neutral screen, motor off, fresh audio cycle.
    pub fn start(&mut self) -> Result<(), RigError> {
        self.ports.pins.write(OutputLine::Motor, false)?;
        self.ports.display.show_default()?;
        self.audio_cycle.reset(&self.timer);
        self.state = RigState::Idle;
        info!(
            colors = self.palette.len(),
            window_s = self.config.response_window.as_secs(),
            "rig ready"
        );
        Ok(())
    }

    /// One idle iteration: audio cycle, sensor, stop check, poll sleep.
    ///
    /// A sensor trigger runs the whole cue window inside this call; the
    /// finished window is returned.
    pub fn tick(&mut self) -> Result<Option<CueRecord>, RigError> {
        if self.state.is_terminating() {
            return Ok(None);
        }

        if self.audio_cycle.is_due(&self.timer) {
            self.play_audio_cue()?;
        }

        let mut record = None;
        if self.ports.pins.read(InputLine::Sensor)? {
            record = self.run_cue_window()?;
        }

        if !self.check_stop()? {
            self.timer.sleep(self.config.poll_interval);
        }
        Ok(record)
    }

    /// Shows a cue and polls the buttons until a response, the window
    /// deadline or a stop request. `None` means the window was abandoned.
    pub fn run_cue_window(&mut self) -> Result<Option<CueRecord>, RigError> {
        let event = self.begin_cue()?;
        loop {
            if let Some(outcome) = self.poll_response(&event)? {
                return self.finish_cue(event, outcome).map(Some);
            }
            if self.check_stop()? {
                self.abandon_cue()?;
                return Ok(None);
            }
            self.timer.sleep(self.config.poll_interval);
        }
    }

    /// Idle → CueActive: random palette color on screen, window opened.
    pub fn begin_cue(&mut self) -> Result<CueEvent, RigError> {
        let index = self.rng.random_range(0..self.palette.len());
        let color = self.palette.get(index);
        self.ports.display.show(color)?;

        let event = CueEvent::new(color, self.timer.now());
        info!(color = %color, at_ms = event.started_at.as_millis() as u64, "cue shown");
        self.current = Some(event.clone());
        self.state = RigState::CueActive;
        Ok(event)
    }

    /// One poll tick of the response window.
    ///
    /// Button A is read before button B, and both before the deadline, so
    /// a simultaneous press is pessimistic and a press on the last tick
    /// still counts.
    pub fn poll_response(&mut self, event: &CueEvent) -> Result<Option<ResponseOutcome>, RigError> {
        if self.ports.pins.read(InputLine::ButtonA)? {
            return Ok(Some(ResponseOutcome::Pessimistic));
        }
        if self.ports.pins.read(InputLine::ButtonB)? {
            return Ok(Some(ResponseOutcome::Optimistic));
        }
        if self.timer.elapsed(event.started_at) >= self.config.response_window {
            return Ok(Some(ResponseOutcome::Timeout));
        }
        Ok(None)
    }

    /// CueActive → Idle. Screen first, then the report, then the reward.
    pub fn finish_cue(
        &mut self,
        event: CueEvent,
        outcome: ResponseOutcome,
    ) -> Result<CueRecord, RigError> {
        let decided_at = self.timer.now();
        self.ports.display.show_default()?;
        self.current = None;

        let record = event.close(outcome, decided_at);
        match (outcome.kind(), outcome.pulse()) {
            (Some(kind), Some(pulse)) => {
                info!(
                    response = %kind,
                    color = %record.color,
                    reaction_ms = record.reaction_time().as_millis() as u64,
                    "response received"
                );
                if !self.ports.reporter.report(self.config.cow_id, kind) {
                    self.summary.failed_reports += 1;
                    warn!(response = %kind, "response report not delivered");
                }
                debug!(secs = pulse.duration().as_secs(), "motor pulse");
                self.ports
                    .pins
                    .pulse(OutputLine::Motor, pulse.duration(), &self.timer)?;
            }
            _ => {
                info!(color = %record.color, "response window timed out");
            }
        }

        self.summary.record(outcome);
        self.state = RigState::Idle;
        Ok(record)
    }

    fn abandon_cue(&mut self) -> Result<(), RigError> {
        if let Some(event) = self.current.take() {
            info!(color = %event.color, "cue abandoned on stop request");
        }
        self.ports.display.show_default()
    }

    fn play_audio_cue(&mut self) -> Result<(), RigError> {
        info!(
            since_last_s = self.audio_cycle.elapsed(&self.timer).as_secs(),
            "playing audio cue"
        );
        self.ports.audio.play_blocking()?;
        self.audio_cycle.reset(&self.timer);
        self.summary.audio_cues += 1;
        Ok(())
    }

    /// Pumps window events, then moves to Terminating if a stop was asked for.
    fn check_stop(&mut self) -> Result<bool, RigError> {
        self.ports.display.pump_events()?;
        if self.ports.stop.stop_requested() {
            if !self.state.is_terminating() {
                info!("stop requested");
            }
            self.state = RigState::Terminating;
            return Ok(true);
        }
        Ok(false)
    }

    /// Best-effort teardown: motor low, neutral screen. Errors are logged,
    /// not returned, so every step is attempted.
    pub fn shutdown(&mut self) {
        self.state = RigState::Terminating;
        self.current = None;
        if let Err(e) = self.ports.pins.release() {
            error!(error = %e, "failed to release outputs");
        }
        if let Err(e) = self.ports.display.show_default() {
            error!(error = %e, "failed to restore neutral screen");
        }
        info!(
            cues = self.summary.cues(),
            optimistic = self.summary.optimistic,
            pessimistic = self.summary.pessimistic,
            timeouts = self.summary.timeouts,
            failed_reports = self.summary.failed_reports,
            audio_cues = self.summary.audio_cues,
            "rig stopped"
        );
    }

    pub fn current_state(&self) -> RigState {
        self.state
    }

    pub fn current_cue(&self) -> Option<&CueEvent> {
        self.current.as_ref()
    }
}
