use std::time::Duration;

/// Fixed timing of the experiment. Reward pulse lengths live with
/// [`cue_core::MotorPulse`].
#[derive(Debug, Clone)]
pub struct RigConfig {
    pub poll_interval: Duration,
    pub response_window: Duration,
    pub audio_period: Duration,
    /// Animal id attached to every report; the rig cannot identify animals.
    pub cow_id: &'static str,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            response_window: Duration::from_secs(30),
            audio_period: Duration::from_secs(30),
            cow_id: "N/A",
        }
    }
}
