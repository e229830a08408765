use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IntervalBound {
    #[error("start")]
    Start,
    #[error("end")]
    End,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Interval {bound} must be a finite number.")]
    NonFiniteBound { bound: IntervalBound },
    #[error("Interval start must be >= 0 (got {start}).")]
    NegativeStart { start: f64 },
    #[error("Interval end {end} is before start {start}.")]
    EndBeforeStart { start: f64, end: f64 },
    #[error("Video id must not be empty.")]
    EmptyVideoId,
    #[error("Invalid listen address '{value}': {source}")]
    InvalidListenAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("Invalid port '{value}': {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Invalid WebSocket URL '{url}': {source}")]
    InvalidWsUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("WebSocket URL '{url}' must use ws:// or wss://.")]
    UnsupportedWsScheme { url: String },
    #[error("Missing playback script (set --script or provide in config).")]
    MissingScript,
    #[error("Missing video id (set --video-id or provide in config).")]
    MissingVideoId,
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
