use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Reward pulse after an optimistic response.
pub const OPTIMISTIC_PULSE: Duration = Duration::from_secs(15);
/// Reward pulse after a pessimistic response.
pub const PESSIMISTIC_PULSE: Duration = Duration::from_secs(5);

/// How a cue window closed. Decided once per cue and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseOutcome {
    Optimistic,
    Pessimistic,
    Timeout,
}

impl ResponseOutcome {
    /// The reportable response, `None` for a timeout.
    pub fn kind(self) -> Option<ResponseKind> {
        match self {
            Self::Optimistic => Some(ResponseKind::Optimistic),
            Self::Pessimistic => Some(ResponseKind::Pessimistic),
            Self::Timeout => None,
        }
    }

    pub fn pulse(self) -> Option<MotorPulse> {
        self.kind().map(MotorPulse::for_response)
    }
}

/// A button response, as sent to the collection endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Optimistic,
    Pessimistic,
}

impl ResponseKind {
    pub const ALL: [ResponseKind; 2] = [ResponseKind::Optimistic, ResponseKind::Pessimistic];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Optimistic => "optimistic",
            Self::Pessimistic => "pessimistic",
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "optimistic" => Ok(Self::Optimistic),
            "pessimistic" => Ok(Self::Pessimistic),
            other => Err(format!(
                "unknown response type `{other}` (expected optimistic or pessimistic)"
            )),
        }
    }
}

/// How long the reward motor runs for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorPulse(pub Duration);

impl MotorPulse {
    pub fn for_response(kind: ResponseKind) -> Self {
        match kind {
            ResponseKind::Optimistic => Self(OPTIMISTIC_PULSE),
            ResponseKind::Pessimistic => Self(PESSIMISTIC_PULSE),
        }
    }

    pub fn duration(self) -> Duration {
        self.0
    }
}
