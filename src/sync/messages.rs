use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, SyncError, ValidationError};
use crate::intervals::{Interval, IntervalSet};

/// Inbound live-channel frame: one watched interval for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub video_id: String,
    pub interval: Interval,
}

/// Outbound live-channel frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    ProgressUpdate { intervals: IntervalSet },
}

impl ServerMessage {
    #[must_use]
    pub const fn progress(intervals: IntervalSet) -> Self {
        Self::ProgressUpdate { intervals }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub intervals: IntervalSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetResponse {
    pub message: String,
}

impl ResetResponse {
    #[must_use]
    pub fn cleared(video_id: &str) -> Self {
        Self {
            message: format!("Progress for video \"{}\" has been cleared.", video_id),
        }
    }
}

/// Decodes and validates a live-channel submission.
///
/// # Errors
///
/// Returns an error when the frame is not valid JSON, a bound is missing or
/// not a number, the interval is invalid, or the video id is empty.
pub fn decode_submission(text: &str) -> AppResult<Submission> {
    let submission: Submission = serde_json::from_str(text)
        .map_err(|err| AppError::sync(SyncError::MalformedSubmission { source: err }))?;
    if submission.video_id.trim().is_empty() {
        return Err(AppError::validation(ValidationError::EmptyVideoId));
    }
    Ok(submission)
}

/// Encodes an outbound frame as JSON text.
///
/// # Errors
///
/// Returns an error when serialization fails.
pub fn encode_server_message(message: &ServerMessage) -> AppResult<String> {
    serde_json::to_string(message).map_err(|err| {
        AppError::sync(SyncError::Serialize {
            context: "progress update",
            source: err,
        })
    })
}

/// Decodes an outbound frame on the client side.
///
/// # Errors
///
/// Returns an error when the text is not a known server message.
pub fn decode_server_message(text: &str) -> AppResult<ServerMessage> {
    serde_json::from_str(text)
        .map_err(|err| AppError::sync(SyncError::MalformedServerMessage { source: err }))
}
