//! Authoritative per-video watched coverage.
//!
//! The store is the only shared mutable state in the service. Callers go
//! through [`ProgressStore`]; the in-memory backend lives in [`memory`].
mod memory;


use crate::intervals::{Interval, IntervalSet};

pub use memory::MemoryStore;

/// Read and mutate watched coverage keyed by video id.
///
/// Implementations must make `submit` atomic against concurrent `submit` and
/// `reset` for the same id, and must not serialize unrelated ids behind one
/// lock for the duration of a merge.
pub trait ProgressStore: Send + Sync {
    /// Current coverage for `video_id`; empty when nothing was recorded.
    fn get(&self, video_id: &str) -> IntervalSet;

    /// Merges `interval` into the stored coverage and returns the new set.
    fn submit(&self, video_id: &str, interval: Interval) -> IntervalSet {
        self.submit_with(video_id, interval, &mut |_: &IntervalSet| {})
    }

    /// Like [`ProgressStore::submit`], calling `on_commit` with the new set
    /// before the update for this id is released to the next writer. Hooks
    /// therefore observe commits for one id in store order.
    ///
    /// A zero-length `interval` changes nothing; `on_commit` still receives
    /// the current set in the same order.
    fn submit_with(
        &self,
        video_id: &str,
        interval: Interval,
        on_commit: &mut dyn FnMut(&IntervalSet),
    ) -> IntervalSet;

    /// Drops all coverage for `video_id`. Resetting an unknown id is a no-op.
    fn reset(&self, video_id: &str) {
        self.reset_with(video_id, &mut || {});
    }

    /// Like [`ProgressStore::reset`], running `on_commit` before any later
    /// submission for this id can commit.
    fn reset_with(&self, video_id: &str, on_commit: &mut dyn FnMut());

    /// Number of videos with a stored entry.
    fn video_count(&self) -> usize;
}
