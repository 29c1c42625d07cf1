use std::time::Duration;

use cue_core::{ResponseKind, StopSignal};
use rand::Rng;
use tracing::{error, info};

use crate::client::ReportClient;
use crate::payload::AnimalData;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(20);

const STOP_POLL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct IntervalPlan {
    pub cow_id: Option<String>,
    /// `None` draws a random response for every post.
    pub response: Option<ResponseKind>,
    pub interval: Duration,
}

/// Posts one record now, then one per interval until `stop` fires. A
/// failed post is logged and the next one goes out on the same schedule.
/// Returns the number of successful posts.
pub fn run_interval_posting<S, R, F>(
    client: &ReportClient,
    plan: &IntervalPlan,
    stop: &S,
    rng: &mut R,
    mut sleep: F,
) -> usize
where
    S: StopSignal,
    R: Rng,
    F: FnMut(Duration),
{
    info!(
        cow_id = plan.cow_id.as_deref().unwrap_or("<random>"),
        response = plan.response.map_or("<random>", ResponseKind::as_str),
        interval_s = plan.interval.as_secs(),
        "starting interval posting"
    );

    let mut delivered = 0;
    loop {
        let data = AnimalData::generate(
            plan.cow_id.as_deref(),
            plan.response,
            client.source(),
            rng,
        );
        let result = client.post(&data);
        let status = if result.is_ok() { "Success" } else { "Failed" };
        info!(status, "posting result");

        match result {
            Ok(()) => delivered += 1,
            Err(e) => error!(error = %e, "error posting animal data"),
        }

        if !wait_unless_stopped(plan.interval, stop, &mut sleep) {
            info!(delivered, "stopping animal data poster");
            return delivered;
        }
    }
}

/// Sleeps `total` in slices; false if a stop arrived first.
fn wait_unless_stopped<S: StopSignal, F: FnMut(Duration)>(
    total: Duration,
    stop: &S,
    sleep: &mut F,
) -> bool {
    let mut left = total;
    while !left.is_zero() {
        if stop.stop_requested() {
            return false;
        }
        let step = left.min(STOP_POLL);
        sleep(step);
        left -= step;
    }
    !stop.stop_requested()
}
