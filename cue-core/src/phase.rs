/// Top-level states of the interaction loop.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default)]
pub enum RigState {
    /// Waiting for the sensor or the audio cycle.
    #[default]
    Idle,
    /// A cue is on screen and the response window is open.
    CueActive,
    /// Stop requested; outputs are being released.
    Terminating,
}

impl RigState {
    pub fn is_terminating(&self) -> bool {
        matches!(self, Self::Terminating)
    }
}
