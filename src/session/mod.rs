//! Client-side session tracking.
//!
//! A [`SessionTracker`] turns play/pause/seek signals and periodic position
//! samples into candidate intervals. [`SessionDriver`] feeds it from a
//! [`PlaybackSurface`] and an event stream, and hands every candidate to a
//! [`SubmissionSink`].
mod driver;
mod scripted;
mod surface;
mod tracker;


pub use driver::{SessionDriver, SessionReport, SubmissionSink};
pub use scripted::{PlaybackScript, ScriptAction, ScriptStep, ScriptedPlayer};
pub use surface::{PlaybackEvent, PlaybackSurface};
pub use tracker::{SessionState, SessionTracker};
