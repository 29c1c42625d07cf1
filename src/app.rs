use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use cue_core::{CuePalette, SignalPins, StopFlag};
use cue_experiment::{InteractionStateMachine, RigConfig, RigPorts, RunSummary};
use cue_report::ReportClient;
use cue_timing::MonotonicTimer;
use tracing::{info, warn};

use crate::audio::RigAudio;
use crate::display::WindowDisplay;
use crate::hardware::{SimulatedLines, SimulatedPins};
use crate::settings::{load_settings, Settings};

#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub config: Option<PathBuf>,
    /// Keyboard-driven inputs instead of GPIO.
    pub simulate: bool,
}

pub struct App {
    settings: Settings,
    simulate: bool,
    stop: StopFlag,
}

impl App {
    pub fn new(options: AppOptions) -> Result<Self> {
        let settings = load_settings(options.config.as_deref())?;
        let stop = StopFlag::new();
        crate::stop_on_signal(&stop).context("cannot install signal handler")?;

        let simulate = options.simulate || !cfg!(feature = "rpi");
        if !options.simulate && simulate {
            warn!("built without the `rpi` feature, using simulated inputs");
        }

        Ok(Self {
            settings,
            simulate,
            stop,
        })
    }

    /// Opens every device, runs until stopped and tears everything down.
    /// Outputs are released before this returns, on success or failure.
    pub fn run(self) -> Result<RunSummary> {
        info!(
            platform = std::env::consts::OS,
            arch = std::env::consts::ARCH,
            simulate = self.simulate,
            endpoint = %self.settings.api_url,
            "starting cue rig"
        );

        if self.simulate {
            let lines = Arc::new(SimulatedLines::default());
            let pins = SimulatedPins::new(Arc::clone(&lines));
            return self.drive(pins, Some(lines));
        }

        self.drive_gpio()
    }

    #[cfg(feature = "rpi")]
    fn drive_gpio(self) -> Result<RunSummary> {
        let pins = crate::hardware::open_rpi_pins(&self.settings.pins)?;
        self.drive(pins, None)
    }

    #[cfg(not(feature = "rpi"))]
    fn drive_gpio(self) -> Result<RunSummary> {
        anyhow::bail!("GPIO access needs a build with the `rpi` feature")
    }

    fn drive<P: SignalPins>(
        self,
        pins: P,
        simulated: Option<Arc<SimulatedLines>>,
    ) -> Result<RunSummary> {
        // Pins come first so the motor is already low while the rest opens.
        let display = WindowDisplay::open(self.stop.clone(), simulated)?;
        let audio = RigAudio::from_setting(self.settings.audio_clip.as_deref())?;
        let reporter = ReportClient::new(self.settings.report_config())
            .context("cannot build HTTP client")?;
        info!(endpoint = reporter.endpoint(), "reporter ready");

        let ports = RigPorts {
            pins,
            display,
            audio,
            reporter,
            stop: self.stop,
        };
        let mut machine = InteractionStateMachine::new(
            RigConfig::default(),
            CuePalette::default(),
            ports,
            MonotonicTimer::default(),
            rand::rng(),
        );
        let summary = machine.run()?;
        Ok(summary)
    }
}
