use super::{ConfigError, PlaybackError, SyncError, ValidationError};

impl From<&'static str> for ValidationError {
    fn from(message: &'static str) -> Self {
        ValidationError::TestExpectation { message }
    }
}

impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        ValidationError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for ConfigError {
    fn from(message: &'static str) -> Self {
        ConfigError::TestExpectation { message }
    }
}

impl From<String> for ConfigError {
    fn from(value: String) -> Self {
        ConfigError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for SyncError {
    fn from(message: &'static str) -> Self {
        SyncError::TestExpectation { message }
    }
}

impl From<String> for SyncError {
    fn from(value: String) -> Self {
        SyncError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for PlaybackError {
    fn from(message: &'static str) -> Self {
        PlaybackError::TestExpectation { message }
    }
}

impl From<String> for PlaybackError {
    fn from(value: String) -> Self {
        PlaybackError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}
