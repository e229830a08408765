use std::time::Duration;

use crate::args::parse_duration_arg;
use crate::config::types::ConfigFile;
use crate::error::{AppError, AppResult};
use crate::intervals::{Interval, IntervalSet};
use crate::sync::{Submission, decode_submission};

/// Builds intervals from little-endian `u16` pairs, in tenths of a second,
/// and merges them in input order.
#[must_use]
pub fn merge_from_bytes(data: &[u8]) -> IntervalSet {
    let mut set = IntervalSet::new();
    for chunk in data.chunks_exact(4) {
        let &[a0, a1, b0, b1] = chunk else {
            continue;
        };
        let start = tenths(u16::from_le_bytes([a0, a1]));
        let end = tenths(u16::from_le_bytes([b0, b1]));
        let (low, high) = if start <= end { (start, end) } else { (end, start) };
        if let Ok(interval) = Interval::new(low, high) {
            set = set.merge(interval);
        }
    }
    set
}

#[expect(clippy::float_arithmetic, reason = "Fuzz input is scaled to seconds.")]
fn tenths(value: u16) -> f64 {
    f64::from(value) / 10.0
}

/// True when members are sorted, non-empty and strictly separated.
#[must_use]
pub fn is_normalized(set: &IntervalSet) -> bool {
    set.iter().all(|interval| !interval.is_empty())
        && set
            .as_slice()
            .windows(2)
            .all(|pair| matches!(pair, [left, right] if left.end() < right.start()))
}

/// Decodes a live-channel submission frame.
///
/// # Errors
///
/// Returns an error when the frame is malformed or invalid.
pub fn decode_submission_input(input: &str) -> AppResult<Submission> {
    decode_submission(input)
}

/// Parses a duration argument (e.g. `10s`, `500ms`).
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_arg_input(input: &str) -> AppResult<Duration> {
    parse_duration_arg(input).map_err(AppError::from)
}

/// Parses TOML config text.
///
/// # Errors
///
/// Returns an error when the text is not a valid config.
pub fn parse_config_toml_input(input: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str(input)
}
