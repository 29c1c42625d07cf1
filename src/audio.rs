use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use cue_core::{AudioCue, RigError};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, info};

/// Bell clip on the default output device.
///
/// The file is read and decoded once when the rig starts; each playback
/// decodes the in-memory copy again.
pub struct BellCue {
    // Dropping the stream silences the device, so it lives as long as the cue.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    clip: Arc<[u8]>,
}

impl BellCue {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("cannot read audio clip {}", path.display()))?;
        let clip: Arc<[u8]> = bytes.into();
        Decoder::new(Cursor::new(Arc::clone(&clip)))
            .with_context(|| format!("cannot decode audio clip {}", path.display()))?;

        let (stream, handle) = OutputStream::try_default().context("no audio output device")?;
        info!(clip = %path.display(), bytes = clip.len(), "audio ready");
        Ok(Self {
            _stream: stream,
            handle,
            clip,
        })
    }
}

impl AudioCue for BellCue {
    fn play_blocking(&mut self) -> Result<(), RigError> {
        let sink = Sink::try_new(&self.handle).map_err(|e| RigError::audio(format!("sink: {e}")))?;
        let source = Decoder::new(Cursor::new(Arc::clone(&self.clip)))
            .map_err(|e| RigError::audio(format!("decode: {e}")))?;
        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}

/// Used when no clip is configured; playback is only logged.
#[derive(Debug, Default)]
pub struct SilentCue;

impl AudioCue for SilentCue {
    fn play_blocking(&mut self) -> Result<(), RigError> {
        debug!("audio cue (silent)");
        Ok(())
    }
}

/// Either cue, picked at start-up.
pub enum RigAudio {
    Bell(BellCue),
    Silent(SilentCue),
}

impl RigAudio {
    pub fn from_setting(clip: Option<&Path>) -> Result<Self> {
        match clip.filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => Ok(Self::Bell(BellCue::load(path)?)),
            None => {
                info!("no audio clip configured, audio cues are silent");
                Ok(Self::Silent(SilentCue))
            }
        }
    }
}

impl AudioCue for RigAudio {
    fn play_blocking(&mut self) -> Result<(), RigError> {
        match self {
            Self::Bell(bell) => bell.play_blocking(),
            Self::Silent(silent) => silent.play_blocking(),
        }
    }
}
