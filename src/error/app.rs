use thiserror::Error;

use super::{ConfigError, PlaybackError, SyncError, ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("Join error: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn sync<E>(error: E) -> Self
    where
        E: Into<SyncError>,
    {
        error.into().into()
    }

    pub fn playback<E>(error: E) -> Self
    where
        E: Into<PlaybackError>,
    {
        error.into().into()
    }
}
