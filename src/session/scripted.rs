use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::{AppError, AppResult, PlaybackError};

use super::surface::{PlaybackEvent, PlaybackSurface};

/// Event channel depth between the scripted player and its consumer.
const EVENT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ScriptAction {
    Play,
    Pause,
    Seek { position: f64 },
    Duration { seconds: f64 },
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScriptStep {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: ScriptAction,
}

/// Timed playback actions, one JSON object per line.
///
/// Blank lines and lines starting with `#` are skipped. `at_ms` is measured
/// from script start and must not decrease.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackScript {
    pub steps: Vec<ScriptStep>,
}

impl PlaybackScript {
    /// Parses a JSON-lines playback script.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed lines, out-of-order steps, or invalid
    /// positions.
    pub fn parse(text: &str) -> Result<Self, PlaybackError> {
        let mut steps = Vec::new();
        let mut last_at = 0_u64;
        for (index, raw) in text.lines().enumerate() {
            let line = index.saturating_add(1);
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let step: ScriptStep = serde_json::from_str(trimmed)
                .map_err(|err| PlaybackError::ParseScript { line, source: err })?;
            if step.at_ms < last_at {
                return Err(PlaybackError::ScriptOutOfOrder { line });
            }
            let position = match step.action {
                ScriptAction::Seek { position } => Some(position),
                ScriptAction::Duration { seconds } => Some(seconds),
                ScriptAction::Play | ScriptAction::Pause | ScriptAction::End => None,
            };
            if let Some(value) = position
                && (!value.is_finite() || value < 0.0)
            {
                return Err(PlaybackError::InvalidPosition { line });
            }
            last_at = step.at_ms;
            steps.push(step);
        }
        Ok(Self { steps })
    }

    /// Reads and parses a script file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            AppError::playback(PlaybackError::ReadScript {
                path: path.to_path_buf(),
                source: err,
            })
        })?;
        Self::parse(&content).map_err(AppError::from)
    }
}

#[derive(Debug, Default)]
struct PlayerState {
    anchor_position: f64,
    playing_since: Option<Instant>,
    duration: Option<f64>,
}

impl PlayerState {
    #[expect(
        clippy::float_arithmetic,
        reason = "Position advances in fractional seconds."
    )]
    fn position_at(&self, now: Instant) -> f64 {
        let elapsed = self
            .playing_since
            .map_or(0.0, |since| now.saturating_duration_since(since).as_secs_f64());
        let position = self.anchor_position + elapsed;
        match self.duration {
            Some(duration) if position > duration => duration,
            Some(_) | None => position,
        }
    }
}

/// Headless player that replays a [`PlaybackScript`] in wall-clock time.
#[derive(Debug, Default)]
pub struct ScriptedPlayer {
    state: Mutex<PlayerState>,
}

impl ScriptedPlayer {
    /// Starts replaying `script`; events arrive on the returned receiver,
    /// which closes after the last step.
    #[must_use]
    pub fn start(
        script: PlaybackScript,
    ) -> (
        Arc<Self>,
        mpsc::Receiver<PlaybackEvent>,
        JoinHandle<()>,
    ) {
        let player = Arc::new(Self::default());
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let task_player = Arc::clone(&player);
        let handle = tokio::spawn(async move {
            let origin = Instant::now();
            for step in script.steps {
                let due = origin
                    .checked_add(Duration::from_millis(step.at_ms))
                    .unwrap_or(origin);
                tokio::time::sleep_until(due).await;
                let Some(event) = task_player.apply(step.action, Instant::now()) else {
                    continue;
                };
                if event_tx.send(event).await.is_err() {
                    break;
                }
            }
        });
        (player, event_rx, handle)
    }

    fn apply(&self, action: ScriptAction, now: Instant) -> Option<PlaybackEvent> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match action {
            ScriptAction::Play => {
                if state.playing_since.is_none() {
                    state.playing_since = Some(now);
                }
                Some(PlaybackEvent::Play)
            }
            ScriptAction::Pause => {
                state.anchor_position = state.position_at(now);
                state.playing_since = None;
                Some(PlaybackEvent::Pause)
            }
            ScriptAction::Seek { position } => {
                state.anchor_position = position;
                if state.playing_since.is_some() {
                    state.playing_since = Some(now);
                }
                Some(PlaybackEvent::Seek { position })
            }
            ScriptAction::Duration { seconds } => {
                state.duration = Some(seconds);
                None
            }
            ScriptAction::End => {
                state.anchor_position = state.position_at(now);
                state.playing_since = None;
                Some(PlaybackEvent::Ended)
            }
        }
    }
}

impl PlaybackSurface for ScriptedPlayer {
    fn current_position(&self) -> Option<f64> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Some(state.position_at(Instant::now()))
    }

    fn duration(&self) -> Option<f64> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.duration
    }
}
