use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::intervals::IntervalSet;
use crate::store::ProgressStore;

use super::fanout::{ConnectionId, Fanout, Outbound};
use super::messages::{ResetResponse, ServerMessage, SnapshotResponse, Submission};

/// Applies submissions to the store and routes the merged results.
///
/// Shared by every live connection and HTTP request of one server.
pub struct SyncService {
    store: Arc<dyn ProgressStore>,
    fanout: Option<Fanout>,
    next_connection: AtomicU64,
}

impl SyncService {
    pub fn new(store: Arc<dyn ProgressStore>, fanout: bool) -> Self {
        Self {
            store,
            fanout: fanout.then(Fanout::new),
            next_connection: AtomicU64::new(1),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn ProgressStore> {
        &self.store
    }

    #[must_use]
    pub const fn fanout_enabled(&self) -> bool {
        self.fanout.is_some()
    }

    pub fn open_connection(&self) -> ConnectionId {
        ConnectionId(self.next_connection.fetch_add(1, Ordering::Relaxed))
    }

    /// Merges a validated submission and returns the new coverage.
    ///
    /// The `progress-update` for `origin` is queued on `reply` before the
    /// store releases the video, as are the copies for other observers when
    /// fan-out is on. Every queue therefore sees one video's coverage in
    /// commit order.
    pub fn apply(
        &self,
        origin: ConnectionId,
        submission: &Submission,
        reply: &Outbound,
    ) -> IntervalSet {
        let video_id = submission.video_id.as_str();
        let changed = !submission.interval.is_empty();
        let mut on_commit = |merged: &IntervalSet| {
            if changed && let Some(fanout) = self.fanout.as_ref() {
                fanout.publish(origin, video_id, merged);
            }
            // A closed reply queue means the connection is already going away.
            drop(reply.send(ServerMessage::progress(merged.clone())));
        };
        self.store
            .submit_with(video_id, submission.interval, &mut on_commit)
    }

    /// Registers `outbound` for updates to `video_id` caused by others.
    ///
    /// Returns `false` while fan-out is off.
    #[must_use]
    pub fn subscribe(&self, video_id: &str, connection: ConnectionId, outbound: Outbound) -> bool {
        match self.fanout.as_ref() {
            Some(fanout) => {
                fanout.subscribe(video_id, connection, outbound);
                true
            }
            None => false,
        }
    }

    pub fn unsubscribe(&self, video_id: &str, connection: ConnectionId) {
        if let Some(fanout) = self.fanout.as_ref() {
            fanout.unsubscribe(video_id, connection);
        }
    }

    /// Number of videos with at least one registered observer.
    #[must_use]
    pub fn observed_videos(&self) -> usize {
        self.fanout.as_ref().map_or(0, Fanout::observed_videos)
    }

    #[must_use]
    pub fn snapshot(&self, video_id: &str) -> SnapshotResponse {
        SnapshotResponse {
            intervals: self.store.get(video_id),
        }
    }

    pub fn reset(&self, video_id: &str) -> ResetResponse {
        match self.fanout.as_ref() {
            Some(fanout) => {
                let mut publish = || {
                    fanout.publish(ConnectionId::EXTERNAL, video_id, &IntervalSet::new());
                };
                self.store.reset_with(video_id, &mut publish);
            }
            None => self.store.reset(video_id),
        }
        ResetResponse::cleared(video_id)
    }
}
