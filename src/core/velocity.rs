//! Release-velocity estimation from recent pointer samples.
//!
//! A small ring buffer of `(position, time)` samples. Velocity is the
//! slope between the newest sample and the oldest one still inside the
//! sampling window, in units per second. Spanning the window rather
//! than the last two events low-passes the jitter of cell-quantized
//! pointer positions.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Enough to span the final few frames of a flick.
const SAMPLE_CAPACITY: usize = 8;

/// Samples older than this do not participate in the estimate.
const SAMPLE_WINDOW: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    samples: VecDeque<(f32, Instant)>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(SAMPLE_CAPACITY),
        }
    }

    /// Record one pointer position.
    pub fn push(&mut self, position: f32, at: Instant) {
        if self.samples.len() == SAMPLE_CAPACITY {
            self.samples.pop_front();
        }
        self.samples.push_back((position, at));
    }

    /// Estimated velocity at `now`, in position units per second.
    ///
    /// Returns 0.0 when there are too few fresh samples to tell; a
    /// pointer that paused before release has no momentum.
    pub fn velocity(&self, now: Instant) -> f32 {
        let Some(&(newest_pos, newest_at)) = self.samples.back() else {
            return 0.0;
        };
        if now.duration_since(newest_at) > SAMPLE_WINDOW {
            return 0.0;
        }
        let oldest_fresh = self
            .samples
            .iter()
            .find(|(_, at)| now.duration_since(*at) <= SAMPLE_WINDOW);
        let Some(&(oldest_pos, oldest_at)) = oldest_fresh else {
            return 0.0;
        };
        let dt = newest_at.duration_since(oldest_at).as_secs_f32();
        if dt <= 0.0 {
            return 0.0;
        }
        (newest_pos - oldest_pos) / dt
    }
}

// ───────────────────────── tests ─────────────────────────
