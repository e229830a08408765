mod app;
mod config;
mod playback;
mod sync;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use playback::PlaybackError;
pub use sync::SyncError;
pub use validation::{IntervalBound, ValidationError};
