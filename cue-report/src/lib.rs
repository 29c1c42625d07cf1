//! Delivery of response events to the remote animal data endpoint.

pub mod client;
pub mod interval;
pub mod payload;

pub use client::{ReportClient, ReportConfig, ReportError};
pub use interval::{DEFAULT_INTERVAL, IntervalPlan, run_interval_posting};
pub use payload::{AnimalData, DEFAULT_SOURCE};
