use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ValidationError;

pub(crate) fn parse_listen_addr(s: &str) -> Result<SocketAddr, ValidationError> {
    s.trim()
        .parse()
        .map_err(|err| ValidationError::InvalidListenAddr {
            value: s.to_owned(),
            source: err,
        })
}

pub(super) fn parse_port(s: &str) -> Result<u16, ValidationError> {
    s.trim()
        .parse()
        .map_err(|err| ValidationError::InvalidPort {
            value: s.to_owned(),
            source: err,
        })
}

/// Parses `250ms`, `5s`, `2m`, `1h` or bare seconds.
pub(crate) fn parse_duration_arg(s: &str) -> Result<Duration, ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty);
    }

    let digits_len = value
        .chars()
        .take_while(char::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return Err(ValidationError::InvalidDurationFormat {
            value: value.to_owned(),
        });
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part
        .parse()
        .map_err(|err| ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })?;

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    let duration = match unit {
        "ms" => Duration::from_millis(number),
        "s" => Duration::from_secs(number),
        "m" => {
            let secs = number
                .checked_mul(60)
                .ok_or(ValidationError::DurationOverflow)?;
            Duration::from_secs(secs)
        }
        "h" => {
            let secs = number
                .checked_mul(60)
                .and_then(|seconds| seconds.checked_mul(60))
                .ok_or(ValidationError::DurationOverflow)?;
            Duration::from_secs(secs)
        }
        _ => {
            return Err(ValidationError::InvalidDurationUnit {
                unit: unit.to_owned(),
            });
        }
    };

    if duration.is_zero() {
        return Err(ValidationError::DurationZero);
    }

    Ok(duration)
}
