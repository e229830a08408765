//! Watched intervals and the normalized set they merge into.
//!
//! An [`IntervalSet`] is always sorted by start with strictly separated
//! members (`a.end < b.start` for neighbours). The only way to grow one is
//! [`IntervalSet::merge`], which keeps that invariant.
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{IntervalBound, ValidationError};


/// A contiguous watched span in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    start: f64,
    end: f64,
}

#[derive(Deserialize)]
struct RawInterval {
    start: f64,
    end: f64,
}

impl TryFrom<RawInterval> for Interval {
    type Error = ValidationError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Interval::new(raw.start, raw.end)
    }
}

impl Interval {
    /// Builds an interval from its bounds.
    ///
    /// # Errors
    ///
    /// Returns an error when a bound is NaN or infinite, when `start` is
    /// negative, or when `end < start`.
    pub fn new(start: f64, end: f64) -> Result<Self, ValidationError> {
        if !start.is_finite() {
            return Err(ValidationError::NonFiniteBound {
                bound: IntervalBound::Start,
            });
        }
        if !end.is_finite() {
            return Err(ValidationError::NonFiniteBound {
                bound: IntervalBound::End,
            });
        }
        if start < 0.0 {
            return Err(ValidationError::NegativeStart { start });
        }
        if end < start {
            return Err(ValidationError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> f64 {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> f64 {
        self.end
    }

    /// Zero-length intervals carry no watched time.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "Interval lengths are fractional seconds."
    )]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn covers(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    fn order(&self, other: &Interval) -> Ordering {
        self.start
            .total_cmp(&other.start)
            .then_with(|| self.end.total_cmp(&other.end))
    }
}

/// Normalized watched coverage for one video.
///
/// Serializes as a plain array of intervals; decoding renormalizes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<Interval>", from = "Vec<Interval>")]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }

    /// Normalizes an arbitrary collection of intervals.
    #[must_use]
    pub fn from_intervals<I>(intervals: I) -> Self
    where
        I: IntoIterator<Item = Interval>,
    {
        Self {
            intervals: normalize(intervals.into_iter().collect()),
        }
    }

    /// Returns the minimal normalized set covering `self` and `incoming`.
    ///
    /// A zero-length `incoming` adds no coverage and is dropped, so the
    /// result equals `self`.
    #[must_use]
    pub fn merge(&self, incoming: Interval) -> Self {
        if incoming.is_empty() {
            return self.clone();
        }
        let mut combined = Vec::with_capacity(self.intervals.len().saturating_add(1));
        combined.extend_from_slice(&self.intervals);
        combined.push(incoming);
        Self {
            intervals: normalize(combined),
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Interval> {
        self.intervals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// True when `interval` lies entirely inside one member.
    #[must_use]
    pub fn contains(&self, interval: &Interval) -> bool {
        self.intervals.iter().any(|member| member.covers(interval))
    }

    #[must_use]
    pub fn watched_seconds(&self) -> f64 {
        self.intervals.iter().map(Interval::length).sum()
    }

    /// Watched share of `duration` in `[0, 1]`; zero while the duration is
    /// unknown.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "Coverage is a ratio of fractional seconds."
    )]
    pub fn coverage_ratio(&self, duration: f64) -> f64 {
        if !duration.is_finite() || duration <= 0.0 {
            return 0.0;
        }
        (self.watched_seconds() / duration).clamp(0.0, 1.0)
    }
}

impl From<Vec<Interval>> for IntervalSet {
    fn from(intervals: Vec<Interval>) -> Self {
        Self::from_intervals(intervals)
    }
}

impl From<IntervalSet> for Vec<Interval> {
    fn from(set: IntervalSet) -> Self {
        set.intervals
    }
}

impl<'set> IntoIterator for &'set IntervalSet {
    type Item = &'set Interval;
    type IntoIter = std::slice::Iter<'set, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

fn normalize(mut combined: Vec<Interval>) -> Vec<Interval> {
    combined.retain(|interval| !interval.is_empty());
    combined.sort_by(Interval::order);

    let mut merged: Vec<Interval> = Vec::with_capacity(combined.len());
    let mut remaining = combined.into_iter();
    let Some(mut current) = remaining.next() else {
        return merged;
    };
    for next in remaining {
        if next.start <= current.end {
            if next.end > current.end {
                current.end = next.end;
            }
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);
    merged
}

/// Renders seconds as `m:ss`, flooring both parts.
#[must_use]
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() {
        seconds.max(0.0).floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
