//! Frame pacing
//!
//! Sleeps until the next frame boundary and reports the wall time since the
//! previous frame as dt.

use std::time::{Duration, Instant};

use crate::consts::MAX_FRAME_DT;

/// Clamp a measured frame time to `[0, MAX_FRAME_DT]`
pub fn clamp_dt(dt: f64) -> f64 {
    if dt > MAX_FRAME_DT {
        log::warn!("Frame took {:.3}s, clamping dt to {MAX_FRAME_DT}s", dt);
        MAX_FRAME_DT
    } else {
        dt.max(0.0)
    }
}

#[derive(Debug)]
pub struct Clock {
    frame_time: Duration,
    last_tick: Instant,
}

impl Clock {
    pub fn new(target_fps: u32) -> Self {
        Self {
            frame_time: Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1))),
            last_tick: Instant::now(),
        }
    }

    /// Wait out the rest of the frame, then return the clamped dt
    pub fn tick(&mut self) -> f64 {
        let elapsed = self.last_tick.elapsed();
        if elapsed < self.frame_time {
            spin_sleep::sleep(self.frame_time - elapsed);
        }

        let dt = self.last_tick.elapsed().as_secs_f64();
        self.last_tick = Instant::now();
        clamp_dt(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_dt() {
        assert_eq!(clamp_dt(0.016), 0.016);
        assert_eq!(clamp_dt(2.5), MAX_FRAME_DT);
        assert_eq!(clamp_dt(-1.0), 0.0);
    }

    #[test]
    fn test_tick_waits_for_frame_boundary() {
        let mut clock = Clock::new(100);
        let dt = clock.tick();
        assert!(dt >= 0.009, "dt = {dt}");
        assert!(dt <= MAX_FRAME_DT);
    }
}
