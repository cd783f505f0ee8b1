//! Redraw rate limiting for live views.

use std::time::{Duration, Instant};

/// Draw-if-elapsed frame limiter.
///
/// Lines can arrive much faster than a terminal should redraw. The limiter
/// answers whether enough time has passed since the last draw; the caller
/// skips the redraw when it has not. The first call is always due.
#[derive(Debug)]
pub struct FrameLimiter {
    interval: Duration,
    last_draw: Option<Instant>,
}

impl FrameLimiter {
    /// Creates a limiter allowing `framerate` draws per second.
    ///
    /// A framerate of zero or less disables limiting.
    #[must_use]
    pub fn new(framerate: f64) -> Self {
        let interval = if framerate > 0.0 {
            Duration::from_secs_f64(1.0 / framerate)
        } else {
            Duration::ZERO
        };
        Self {
            interval,
            last_draw: None,
        }
    }

    /// True when a redraw is due; stamps the draw time when it is.
    pub fn ready(&mut self) -> bool {
        let now = Instant::now();
        let due = self
            .last_draw
            .is_none_or(|last| now.duration_since(last) >= self.interval);
        if due {
            self.last_draw = Some(now);
        }
        due
    }
}
