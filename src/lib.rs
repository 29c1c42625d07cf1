//! Adapters and wiring for the cue rig: GPIO, the cue window, the bell
//! clip, deployment settings and the process-level setup shared by the
//! binaries.

pub mod app;
pub mod audio;
pub mod display;
pub mod hardware;
pub mod settings;

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    tracing_subscriber::fmt().with_env_filter(default_filter()).init();
}

/// Like [`init_logging`], with every line also appended to `path`.
pub fn init_logging_with_file(path: &Path) -> anyhow::Result<()> {
    let file = open_log_file(path)?;
    tracing_subscriber::registry()
        .with(default_filter())
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
        .init();
    Ok(())
}

fn open_log_file(path: &Path) -> anyhow::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))
}

/// Routes Ctrl-C and SIGTERM to `stop`.
pub fn stop_on_signal(stop: &cue_core::StopFlag) -> anyhow::Result<()> {
    let stop = stop.clone();
    ctrlc::set_handler(move || {
        tracing::info!("interrupt received, stopping");
        stop.request_stop();
    })?;
    Ok(())
}
