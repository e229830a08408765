use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use url::Url;

use crate::error::AppResult;
use crate::intervals::{IntervalSet, format_clock};
use crate::session::{PlaybackScript, PlaybackSurface, ScriptedPlayer, SessionDriver};
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};
use crate::sync::connect_live;

/// Time allowed for trailing progress updates after the session ends.
const UPDATE_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

pub(crate) struct WatchPlan {
    pub(crate) url: Url,
    pub(crate) video_id: String,
    pub(crate) script: PlaybackScript,
    pub(crate) sample_interval: Duration,
}

pub(crate) async fn run_watch(plan: WatchPlan) -> AppResult<()> {
    let (sink, live) = connect_live(&plan.url).await?;
    info!("Watching video {} via {}", plan.video_id, plan.url);

    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let (player, events, player_task) = ScriptedPlayer::start(plan.script);
    let surface: Arc<dyn PlaybackSurface> = player;
    let reporter = spawn_progress_reporter(live.updates, Arc::clone(&surface));

    let driver = SessionDriver::new(plan.video_id, surface, sink, plan.sample_interval);
    let outcome = driver.run(events, shutdown_tx.subscribe()).await;

    player_task.abort();
    drop(shutdown_tx.send(()));
    signal_handle.await?;
    if tokio::time::timeout(UPDATE_DRAIN_TIMEOUT, reporter)
        .await
        .is_err()
    {
        warn!("Server did not close the live channel in time");
        live.reader.abort();
    }

    let report = outcome?;
    info!(
        "Session finished after {} submission(s){}",
        report.submissions,
        if report.discarded_open_segment {
            "; open segment discarded"
        } else {
            ""
        }
    );
    Ok(())
}

fn spawn_progress_reporter(
    mut updates: mpsc::UnboundedReceiver<IntervalSet>,
    surface: Arc<dyn PlaybackSurface>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(intervals) = updates.recv().await {
            let watched = format_clock(intervals.watched_seconds());
            match surface.duration() {
                Some(duration) => info!(
                    "Watched {} of {} ({:.1}%) in {} segment(s)",
                    watched,
                    format_clock(duration),
                    percent(intervals.coverage_ratio(duration)),
                    intervals.len()
                ),
                None => info!("Watched {} in {} segment(s)", watched, intervals.len()),
            }
        }
    })
}

#[expect(clippy::float_arithmetic, reason = "Ratio is shown as a percentage.")]
fn percent(ratio: f64) -> f64 {
    ratio * 100.0
}
