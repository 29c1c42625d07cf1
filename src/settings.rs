use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use cue_report::{ReportConfig, DEFAULT_SOURCE};
use serde::{Deserialize, Deserializer};

pub const DEFAULT_SETTINGS_FILE: &str = "rig.toml";
const ENV_PREFIX: &str = "CUE_RIG__";

/// BCM pin numbers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PinMap {
    pub button_a: u8,
    pub button_b: u8,
    pub sensor: u8,
    pub motor: u8,
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            button_a: 6,
            button_b: 5,
            sensor: 21,
            motor: 23,
        }
    }
}

/// Deployment settings. Experiment timing is fixed and not in here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_url: String,
    pub api_key: String,
    pub source: String,
    pub request_timeout_secs: u64,
    /// Bell clip played every audio cycle. An empty path means silent cues.
    #[serde(deserialize_with = "empty_path_as_none")]
    pub audio_clip: Option<PathBuf>,
    pub pins: PinMap,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".into(),
            api_key: String::new(),
            source: DEFAULT_SOURCE.into(),
            request_timeout_secs: 10,
            audio_clip: Some(PathBuf::from("/home/animalvideogame/BellSoundCue.wav")),
            pins: PinMap::default(),
        }
    }
}

impl Settings {
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            source: self.source.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

fn empty_path_as_none<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_empty(Option::<PathBuf>::deserialize(deserializer)?))
}

fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}

/// Defaults, then the settings file (if it exists), then `CUE_RIG__*`
/// environment variables.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<Settings>(&raw)
            .with_context(|| format!("invalid settings file {}", path.display()))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
        Err(e) => {
            return Err(e).with_context(|| format!("cannot read {}", path.display()));
        }
    };
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

    if let Some(v) = var("API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = var("API_KEY") {
        settings.api_key = v;
    }
    if let Some(v) = var("SOURCE") {
        settings.source = v;
    }
    if let Some(v) = var("REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v
            .parse()
            .with_context(|| format!("{ENV_PREFIX}REQUEST_TIMEOUT_SECS={v} is not a number"))?;
    }
    if let Some(v) = var("AUDIO_CLIP") {
        settings.audio_clip = non_empty(Some(PathBuf::from(v)));
    }

    let pins = &mut settings.pins;
    for (name, pin) in [
        ("PINS__BUTTON_A", &mut pins.button_a),
        ("PINS__BUTTON_B", &mut pins.button_b),
        ("PINS__SENSOR", &mut pins.sensor),
        ("PINS__MOTOR", &mut pins.motor),
    ] {
        if let Some(v) = var(name) {
            *pin = v
                .parse()
                .with_context(|| format!("{ENV_PREFIX}{name}={v} is not a BCM pin number"))?;
        }
    }
    Ok(())
}
