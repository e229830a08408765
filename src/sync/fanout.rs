use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

use crate::intervals::IntervalSet;

use super::messages::ServerMessage;

/// Outbound queue of one live connection, drained by its writer task.
pub type Outbound = mpsc::UnboundedSender<ServerMessage>;

/// Identifies one live connection within a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

impl ConnectionId {
    /// Origin of updates that did not come from a live connection (HTTP reset).
    pub const EXTERNAL: Self = Self(0);
}

/// Per-video registry of observer queues for multi-observer updates.
///
/// `publish` pushes straight into each observer's outbound queue, so when it
/// is called under the store's per-video lock every queue sees that video's
/// updates in commit order. A video stays registered only while it has
/// observers.
#[derive(Debug, Default)]
pub struct Fanout {
    observers: Mutex<HashMap<String, HashMap<ConnectionId, Outbound>>>,
}

impl Fanout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, video_id: &str, connection: ConnectionId, outbound: Outbound) {
        let mut observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        observers
            .entry(video_id.to_owned())
            .or_default()
            .insert(connection, outbound);
    }

    pub fn unsubscribe(&self, video_id: &str, connection: ConnectionId) {
        let mut observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(queues) = observers.get_mut(video_id) else {
            return;
        };
        queues.remove(&connection);
        if queues.is_empty() {
            observers.remove(video_id);
        }
    }

    /// Sends `intervals` to every observer of `video_id` except `origin`.
    /// Closed queues are pruned.
    pub fn publish(&self, origin: ConnectionId, video_id: &str, intervals: &IntervalSet) {
        let mut observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(queues) = observers.get_mut(video_id) else {
            return;
        };
        queues.retain(|connection, outbound| {
            if *connection == origin {
                return !outbound.is_closed();
            }
            outbound
                .send(ServerMessage::progress(intervals.clone()))
                .is_ok()
        });
        if queues.is_empty() {
            observers.remove(video_id);
        }
    }

    #[must_use]
    pub fn observed_videos(&self) -> usize {
        let observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        observers.len()
    }
}
