//! Countdown timer gating repeatable actions

use serde::{Deserialize, Serialize};

/// Leftover time below this counts as expired; absorbs float drift from summed frame times
const EXPIRY_EPSILON: f64 = 1e-9;

/// Ready when `remaining` has counted down to zero.
///
/// `remaining` stays within `[0, duration]`: it only shrinks with time and
/// jumps back to `duration` on a successful [`Cooldown::trigger`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    duration: f64,
    remaining: f64,
}

impl Cooldown {
    /// A cooldown that is ready immediately
    pub fn new(duration: f64) -> Self {
        debug_assert!(duration > 0.0, "cooldown duration must be positive");
        Self {
            duration,
            remaining: 0.0,
        }
    }

    /// A cooldown that starts a full period away from ready
    pub fn primed(duration: f64) -> Self {
        Self {
            remaining: duration,
            ..Self::new(duration)
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    #[inline]
    pub fn ready(&self) -> bool {
        self.remaining == 0.0
    }

    /// Count down by `dt`, stopping at zero
    pub fn tick(&mut self, dt: f64) {
        self.remaining -= dt;
        if self.remaining <= EXPIRY_EPSILON {
            self.remaining = 0.0;
        }
    }

    /// Start a new period if ready. Returns false (and changes nothing) otherwise.
    pub fn trigger(&mut self) -> bool {
        if !self.ready() {
            return false;
        }
        self.remaining = self.duration;
        true
    }

    /// Change the period; a running countdown is cut to the new duration
    pub fn set_duration(&mut self, duration: f64) {
        debug_assert!(duration > 0.0, "cooldown duration must be positive");
        self.duration = duration;
        self.remaining = self.remaining.min(duration);
    }

    /// 0.0 right after triggering, 1.0 when ready (for HUD gauges)
    pub fn charge(&self) -> f64 {
        1.0 - self.remaining / self.duration
    }
}
