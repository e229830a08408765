use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{Interval as Ticker, MissedTickBehavior};
use tracing::debug;

use crate::error::AppResult;
use crate::intervals::Interval;
use crate::shutdown::ShutdownReceiver;

use super::surface::{PlaybackEvent, PlaybackSurface};
use super::tracker::{SessionState, SessionTracker};

/// Destination for candidate intervals, usually the live channel.
#[async_trait]
pub trait SubmissionSink: Send {
    async fn submit(&mut self, video_id: &str, interval: Interval) -> AppResult<()>;

    /// Called once after the session stops.
    async fn finish(&mut self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub submissions: u64,
    /// True when the session ended with a segment still open.
    pub discarded_open_segment: bool,
}

/// Drives a [`SessionTracker`] from a playback surface.
pub struct SessionDriver<K> {
    tracker: SessionTracker,
    surface: Arc<dyn PlaybackSurface>,
    sink: K,
    sample_interval: Duration,
    submissions: u64,
}

impl<K> SessionDriver<K>
where
    K: SubmissionSink,
{
    pub fn new(
        video_id: impl Into<String>,
        surface: Arc<dyn PlaybackSurface>,
        sink: K,
        sample_interval: Duration,
    ) -> Self {
        Self {
            tracker: SessionTracker::new(video_id),
            surface,
            sink,
            sample_interval,
            submissions: 0,
        }
    }

    /// Runs until the event stream closes or shutdown is signalled.
    ///
    /// A segment still open at that point is dropped without submission.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by the submission sink.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<PlaybackEvent>,
        mut shutdown_rx: ShutdownReceiver,
    ) -> AppResult<SessionReport> {
        let mut ticker = tokio::time::interval(self.sample_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let playing = self.tracker.state() == SessionState::Playing;
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                event = events.recv() => {
                    let Some(event) = event else {
                        break;
                    };
                    self.handle_event(event, &mut ticker).await?;
                }
                _ = ticker.tick(), if playing => {
                    let position = self.surface.current_position();
                    if let Some(interval) = self.tracker.sample(position) {
                        self.submit(interval).await?;
                    }
                }
            }
        }

        let discarded_open_segment = self.tracker.open_segment().is_some();
        if discarded_open_segment {
            debug!(
                "Discarding open segment for video {} at session end",
                self.tracker.video_id()
            );
        }
        self.sink.finish().await?;
        Ok(SessionReport {
            submissions: self.submissions,
            discarded_open_segment,
        })
    }

    async fn handle_event(&mut self, event: PlaybackEvent, ticker: &mut Ticker) -> AppResult<()> {
        match event {
            PlaybackEvent::Play => {
                self.tracker.play(self.surface.current_position());
                ticker.reset();
                Ok(())
            }
            PlaybackEvent::Pause | PlaybackEvent::Ended => {
                let closed = self.tracker.pause(self.surface.current_position());
                self.submit_closed(closed).await
            }
            PlaybackEvent::Seek { position } => {
                let closed = self.tracker.seek(position);
                ticker.reset();
                self.submit_closed(closed).await
            }
        }
    }

    async fn submit_closed(&mut self, closed: Option<Interval>) -> AppResult<()> {
        match closed {
            Some(interval) => self.submit(interval).await,
            None => Ok(()),
        }
    }

    async fn submit(&mut self, interval: Interval) -> AppResult<()> {
        self.sink.submit(self.tracker.video_id(), interval).await?;
        self.submissions = self.submissions.saturating_add(1);
        Ok(())
    }
}
