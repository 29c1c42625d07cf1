use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cue_rig::app::{App, AppOptions};
use tracing::error;

/// Shows a color cue when the animal approaches and rewards its button
/// choice with a motor pulse.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Settings file (defaults to ./rig.toml when present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Drive inputs from the keyboard (S = sensor, A/B = buttons).
    #[arg(long)]
    simulate: bool,
}

fn main() -> ExitCode {
    cue_rig::init_logging();
    let cli = Cli::parse();

    let result = App::new(AppOptions {
        config: cli.config,
        simulate: cli.simulate,
    })
    .and_then(App::run);

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("cue rig stopped: {e:#}");
            ExitCode::FAILURE
        }
    }
}
