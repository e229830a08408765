use crate::intervals::Interval;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Playing,
}

#[derive(Debug, Clone, Copy)]
struct OpenSegment {
    start: f64,
    end: f64,
}

impl OpenSegment {
    const fn at(position: f64) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    fn to_interval(self) -> Option<Interval> {
        Interval::new(self.start, self.end).ok()
    }
}

/// Per-connection play/pause state machine.
///
/// Every accepted sample yields the whole open segment again with a grown
/// end, so a dropped connection loses at most one sampling period.
#[derive(Debug)]
pub struct SessionTracker {
    video_id: String,
    state: SessionState,
    segment: Option<OpenSegment>,
}

impl SessionTracker {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            state: SessionState::Idle,
            segment: None,
        }
    }

    #[must_use]
    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// The segment accumulated so far, if any.
    #[must_use]
    pub fn open_segment(&self) -> Option<Interval> {
        self.segment.and_then(OpenSegment::to_interval)
    }

    /// Opens a segment at `position`.
    ///
    /// Ignored while already playing. An unusable position still enters
    /// `Playing`; the first valid sample then opens the segment.
    pub fn play(&mut self, position: Option<f64>) {
        if self.state == SessionState::Playing {
            return;
        }
        self.state = SessionState::Playing;
        self.segment = usable(position).map(OpenSegment::at);
    }

    /// Extends the open segment to `position` and returns it for submission.
    pub fn sample(&mut self, position: Option<f64>) -> Option<Interval> {
        if self.state != SessionState::Playing {
            return None;
        }
        let position = usable(position)?;
        let Some(segment) = self.segment.as_mut() else {
            self.segment = Some(OpenSegment::at(position));
            return None;
        };
        if position < segment.start {
            return None;
        }
        segment.end = position;
        segment.to_interval()
    }

    /// Closes the open segment and returns its final bounds.
    ///
    /// `final_position` is a last reading taken at pause time; it extends the
    /// segment under the same rules as [`SessionTracker::sample`].
    pub fn pause(&mut self, final_position: Option<f64>) -> Option<Interval> {
        if self.state != SessionState::Playing {
            return None;
        }
        self.extend_quietly(final_position);
        self.state = SessionState::Idle;
        self.segment.take().and_then(OpenSegment::to_interval)
    }

    /// Closes the open segment and reopens at the seek target.
    ///
    /// Only meaningful while playing; the skipped region is never claimed.
    pub fn seek(&mut self, target: f64) -> Option<Interval> {
        if self.state != SessionState::Playing {
            return None;
        }
        let closed = self.segment.take().and_then(OpenSegment::to_interval);
        self.segment = usable(Some(target)).map(OpenSegment::at);
        closed
    }

    fn extend_quietly(&mut self, position: Option<f64>) {
        if let (Some(position), Some(segment)) = (usable(position), self.segment.as_mut())
            && position >= segment.start
        {
            segment.end = position;
        }
    }
}

fn usable(position: Option<f64>) -> Option<f64> {
    position.filter(|value| value.is_finite() && *value >= 0.0)
}
