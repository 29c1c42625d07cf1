use std::time::Duration;

use cue_core::{ResponseKind, ResponseReporter};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{error, info};

use crate::payload::{AnimalData, DEFAULT_SOURCE};

const DATA_PATH: &str = "/animal/data";

#[derive(Debug, Error)]
pub enum ReportError {
    /// No HTTP response: connection refused, DNS, TLS, timeout.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint answered {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Base URL; the data path is appended.
    pub api_url: String,
    pub api_key: String,
    pub source: String,
    pub timeout: Duration,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".into(),
            api_key: String::new(),
            source: DEFAULT_SOURCE.into(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Blocking HTTP client for the animal data endpoint.
pub struct ReportClient {
    http: Client,
    endpoint: String,
    api_key: String,
    source: String,
}

impl ReportClient {
    pub fn new(config: ReportConfig) -> Result<Self, ReportError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        let endpoint = format!("{}{DATA_PATH}", config.api_url.trim_end_matches('/'));
        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key,
            source: config.source,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Sends one record. 200 and 201 count as delivered.
    pub fn post(&self, data: &AnimalData) -> Result<(), ReportError> {
        info!(
            cow_id = %data.cow_id,
            response = %data.response_type,
            "posting animal data"
        );
        let response = self
            .http
            .post(&self.endpoint)
            .header("X-API-Key", &self.api_key)
            .header("accept", "application/json")
            .json(data)
            .send()?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        if status == StatusCode::OK || status == StatusCode::CREATED {
            info!(cow_id = %data.cow_id, body = %truncate(&body, 100), "animal data posted");
            Ok(())
        } else {
            Err(ReportError::Rejected { status, body })
        }
    }

    /// Builds a record stamped now and posts it, logging any failure.
    pub fn send(&self, cow_id: &str, kind: ResponseKind) -> Result<(), ReportError> {
        let data = AnimalData::new(cow_id, kind, &self.source);
        self.post(&data).inspect_err(|e| {
            error!(error = %e, cow_id, response = %kind, "failed to post animal data");
        })
    }
}

impl ResponseReporter for ReportClient {
    fn report(&mut self, cow_id: &str, kind: ResponseKind) -> bool {
        self.send(cow_id, kind).is_ok()
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
