use chrono::{Local, SecondsFormat};
use cue_core::ResponseKind;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOURCE: &str = "Raspberry Pi";

const KNOWN_COWS: [&str; 3] = ["cow1", "cow2", "cow3"];

/// Body of `POST /animal/data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalData {
    pub cow_id: String,
    pub response_type: ResponseKind,
    /// RFC 3339 local time with UTC offset.
    pub time: String,
    /// Reserved; always serialised, as `null` when empty.
    pub metadata: Option<serde_json::Value>,
    pub source: String,
}

impl AnimalData {
    pub fn new(cow_id: impl Into<String>, response_type: ResponseKind, source: &str) -> Self {
        Self {
            cow_id: cow_id.into(),
            response_type,
            time: Local::now().to_rfc3339_opts(SecondsFormat::Micros, false),
            metadata: None,
            source: source.to_string(),
        }
    }

    /// Fills in whatever the caller left out: a random cow id (one of the
    /// known herd half the time, otherwise a three digit number) and a
    /// random response.
    pub fn generate<R: Rng>(
        cow_id: Option<&str>,
        response_type: Option<ResponseKind>,
        source: &str,
        rng: &mut R,
    ) -> Self {
        let cow_id = match cow_id {
            Some(id) => id.to_string(),
            None => random_cow_id(rng),
        };
        let response_type = match response_type {
            Some(kind) => kind,
            None => *ResponseKind::ALL
                .choose(rng)
                .unwrap_or(&ResponseKind::Optimistic),
        };
        Self::new(cow_id, response_type, source)
    }
}

fn random_cow_id<R: Rng>(rng: &mut R) -> String {
    if rng.random_bool(0.5) {
        KNOWN_COWS[rng.random_range(0..KNOWN_COWS.len())].to_string()
    } else {
        rng.random_range(100..=999).to_string()
    }
}
