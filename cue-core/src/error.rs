use thiserror::Error;

/// Fatal rig failures. Any of these ends the run after teardown.
#[derive(Debug, Error)]
pub enum RigError {
    #[error("hardware I/O failed: {0}")]
    Hardware(String),
    #[error("display failed: {0}")]
    Display(String),
    #[error("audio playback failed: {0}")]
    Audio(String),
}

impl RigError {
    pub fn hardware(msg: impl Into<String>) -> Self {
        Self::Hardware(msg.into())
    }

    pub fn display(msg: impl Into<String>) -> Self {
        Self::Display(msg.into())
    }

    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("cue palette must contain at least one color")]
    Empty,
}
