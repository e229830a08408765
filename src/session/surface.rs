/// Discrete signals raised by the playback surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    Play,
    Pause,
    Seek { position: f64 },
    Ended,
}

/// Read side of a video player.
///
/// `current_position` returns `None` when the player cannot report a numeric
/// position (not loaded yet, torn down, ...).
pub trait PlaybackSurface: Send + Sync {
    fn current_position(&self) -> Option<f64>;

    fn duration(&self) -> Option<f64>;
}
