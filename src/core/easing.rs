//! Time-bounded offset tween with cubic ease-out.
//!
//! One tween is one settle: it carries the landing index so completion
//! can finalize the active card. Deceleration into rest is the point;
//! the strip should arrive, not bounce.

use std::time::{Duration, Instant};

/// Cubic ease-out: fast exit, asymptotic arrival.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// A single in-flight settle animation.
#[derive(Debug, Clone, Copy)]
pub struct SettleTween {
    start: f32,
    target: f32,
    index: usize,
    started_at: Instant,
    duration: Duration,
}

impl SettleTween {
    pub fn new(
        start: f32,
        target: f32,
        index: usize,
        started_at: Instant,
        duration: Duration,
    ) -> Self {
        Self {
            start,
            target,
            index,
            started_at,
            duration,
        }
    }

    /// The index this settle lands on.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_done(&self, now: Instant) -> bool {
        now.duration_since(self.started_at) >= self.duration
    }

    /// Eased offset at `now`; rests exactly on `target` once elapsed.
    pub fn sample(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return self.target;
        }
        let elapsed = now.duration_since(self.started_at).as_secs_f32();
        let t = (elapsed / self.duration.as_secs_f32()).min(1.0);
        self.start + (self.target - self.start) * ease_out_cubic(t)
    }
}

// ───────────────────────── tests ─────────────────────────
