//! Posts synthetic animal data to the collection endpoint, for checking a
//! deployment end to end without the rig.

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use cue_core::{ResponseKind, StopFlag};
use cue_report::{run_interval_posting, AnimalData, IntervalPlan, ReportClient, DEFAULT_INTERVAL};
use cue_rig::settings::load_settings;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Animal id to send; `random` picks one per post.
    #[arg(long, alias = "cow_id", default_value = "N/A")]
    cow_id: String,

    /// optimistic or pessimistic; random per post when omitted.
    #[arg(long)]
    response: Option<ResponseKind>,

    /// Seconds between posts.
    #[arg(long, default_value_t = DEFAULT_INTERVAL.as_secs())]
    interval: u64,

    /// Post a single record and exit.
    #[arg(long)]
    once: bool,

    /// Settings file with the endpoint and API key.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log lines are appended here as well as printed.
    #[arg(long, value_name = "PATH", default_value = "animal_data_poster.log")]
    log_file: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = cue_rig::init_logging_with_file(&cli.log_file) {
        cue_rig::init_logging();
        warn!("logging to stdout only: {e:#}");
    }
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Ok(false) when a `--once` post was not delivered.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let settings = load_settings(cli.config.as_deref())?;
    let client = ReportClient::new(settings.report_config()).context("cannot build HTTP client")?;
    info!(endpoint = client.endpoint(), "animal data poster");

    let cow_id = (cli.cow_id != "random").then_some(cli.cow_id);
    let mut rng = rand::rng();

    if cli.once {
        let data = AnimalData::generate(cow_id.as_deref(), cli.response, client.source(), &mut rng);
        return Ok(match client.post(&data) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "error posting animal data");
                false
            }
        });
    }

    let stop = StopFlag::new();
    cue_rig::stop_on_signal(&stop).context("cannot install signal handler")?;
    let plan = IntervalPlan {
        cow_id,
        response: cli.response,
        interval: Duration::from_secs(cli.interval),
    };
    run_interval_posting(&client, &plan, &stop, &mut rng, thread::sleep);
    Ok(true)
}
