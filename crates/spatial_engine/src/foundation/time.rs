//! Frame timing
//!
//! Simulation steps use a clamped delta: a stalled frame must not launch the
//! verlet points, and a burst of tiny frames must not stall integration.

use std::time::Instant;

use log::warn;

/// Clamp a raw frame delta into `[min, max]`
///
/// Non-finite or negative input falls back to `min`.
pub fn clamp_delta(delta: f32, min: f32, max: f32) -> f32 {
    if !delta.is_finite() || delta < 0.0 {
        warn!("discarding invalid frame delta {delta}");
        return min;
    }
    delta.max(min).min(max)
}

/// Host-side frame clock producing clamped deltas
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: Instant,
    min_delta: f32,
    max_delta: f32,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl FrameClock {
    /// Create a clock clamping to `[min_delta, max_delta]` seconds
    pub fn new(min_delta: f32, max_delta: f32) -> Self {
        Self {
            last_frame: Instant::now(),
            min_delta,
            max_delta,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance one frame and return the clamped delta
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(elapsed)
    }

    /// Advance by an externally measured delta (XR runtimes hand one out)
    pub fn advance(&mut self, raw_delta: f32) -> f32 {
        let delta = clamp_delta(raw_delta, self.min_delta, self.max_delta);
        if raw_delta > self.max_delta {
            warn!("frame delta {raw_delta:.4}s clamped to {delta:.4}s");
        }
        self.delta_time = delta;
        self.total_time += delta;
        self.frame_count += 1;
        delta
    }

    /// Last clamped delta in seconds
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Sum of clamped deltas
    pub const fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Frames advanced so far
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamp_delta() {
        assert_relative_eq!(clamp_delta(1.0, 0.01, 0.1), 0.1);
        assert_relative_eq!(clamp_delta(0.0, 0.01, 0.1), 0.01);
        assert_relative_eq!(clamp_delta(0.05, 0.01, 0.1), 0.05);
        assert_relative_eq!(clamp_delta(f32::NAN, 0.01, 0.1), 0.01);
    }

    #[test]
    fn test_frame_clock_accumulates_clamped_time() {
        let mut clock = FrameClock::new(0.01, 0.1);
        clock.advance(0.5);
        clock.advance(0.05);
        assert_eq!(clock.frame_count(), 2);
        assert_relative_eq!(clock.delta_time(), 0.05);
        assert_relative_eq!(clock.total_time(), 0.15, epsilon = 1e-6);
        assert!(clock.tick() >= 0.01);
    }
}
