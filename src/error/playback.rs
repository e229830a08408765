use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Failed to read playback script '{path}': {source}")]
    ReadScript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid playback script line {line}: {source}")]
    ParseScript {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Playback script line {line}: 'at_ms' must not go backwards.")]
    ScriptOutOfOrder { line: usize },
    #[error("Playback script line {line}: position must be a finite number >= 0.")]
    InvalidPosition { line: usize },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
