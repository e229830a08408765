use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::intervals::{Interval, IntervalSet};

use super::ProgressStore;

/// Per-video slot. `None` marks a slot retired by `reset`; a writer holding a
/// retired slot must look the id up again.
type Slot = Mutex<Option<IntervalSet>>;

/// Process-lifetime store backed by a map of per-video locks.
///
/// The map lock is only held to find or create a slot. Merges run under the
/// slot's own mutex, so different videos never wait on each other's merge.
#[derive(Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<String, Arc<Slot>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn existing_slot(&self, video_id: &str) -> Option<Arc<Slot>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(video_id).cloned()
    }

    fn slot_for_write(&self, video_id: &str) -> Arc<Slot> {
        if let Some(slot) = self.existing_slot(video_id) {
            return slot;
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            slots
                .entry(video_id.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(Some(IntervalSet::new())))),
        )
    }

    /// Hands the current set to `on_commit` without changing it, ordered
    /// against commits for the same id.
    fn observe_current(
        &self,
        video_id: &str,
        on_commit: &mut dyn FnMut(&IntervalSet),
    ) -> IntervalSet {
        loop {
            let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
            let Some(slot) = slots.get(video_id).cloned() else {
                // The read guard keeps a first submission from committing first.
                let empty = IntervalSet::new();
                on_commit(&empty);
                return empty;
            };
            drop(slots);
            let guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(current) = guard.as_ref() {
                on_commit(current);
                return current.clone();
            }
        }
    }
}

impl ProgressStore for MemoryStore {
    fn get(&self, video_id: &str) -> IntervalSet {
        let Some(slot) = self.existing_slot(video_id) else {
            return IntervalSet::new();
        };
        let guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clone().unwrap_or_default()
    }

    fn submit_with(
        &self,
        video_id: &str,
        interval: Interval,
        on_commit: &mut dyn FnMut(&IntervalSet),
    ) -> IntervalSet {
        if interval.is_empty() {
            return self.observe_current(video_id, on_commit);
        }
        loop {
            let slot = self.slot_for_write(video_id);
            let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(current) = guard.as_mut() {
                let merged = current.merge(interval);
                *current = merged.clone();
                on_commit(&merged);
                return merged;
            }
            // Retired by a concurrent reset; retry against a fresh slot.
        }
    }

    fn reset_with(&self, video_id: &str, on_commit: &mut dyn FnMut()) {
        loop {
            let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
            let Some(slot) = slots.get(video_id).cloned() else {
                on_commit();
                return;
            };
            drop(slots);
            let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            if guard.is_none() {
                // Unlinked by a concurrent reset; clear whatever replaced it.
                continue;
            }
            // Slot before map: the write lock only covers the unlink, and no
            // fresh slot for this id can commit before `on_commit` runs.
            let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
            slots.remove(video_id);
            *guard = None;
            on_commit();
            return;
        }
    }

    fn video_count(&self) -> usize {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.len()
    }
}
