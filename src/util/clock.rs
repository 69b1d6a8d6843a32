//! Frame pacing.

use std::time::{Duration, Instant};

/// Keeps a render loop at a target frame rate.
///
/// # Example
///
/// ```rust ,no_run
/// use pixterm::util::clock::Clock;
///
/// let mut clock = Clock::new();
/// loop {
///     // draw and update ...
///     clock.tick(30.0);
///     eprintln!("{:.1} fps", clock.fps());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    /// Start of the current frame.
    now: Instant,
    /// Duration of the last complete frame, sleep included.
    last_dt: Duration,
    /// How much longer the last sleep() slept than asked.
    last_overhead: Duration,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self {
            now: Instant::now(),
            last_dt: Duration::ZERO,
            last_overhead: Duration::ZERO,
        }
    }

    /// Sleeps for whatever is left of the current frame at `fps` frames per second, then
    /// starts the next frame.
    ///
    /// A non-positive or non-finite `fps` does not sleep at all.
    pub fn tick(&mut self, fps: f64) -> Duration {
        let frame = if fps.is_finite() && fps > 0.0 {
            Duration::from_secs_f64(1.0 / fps)
        } else {
            Duration::ZERO
        };

        let current = Instant::now();
        let remaining = frame
            .saturating_sub(current.duration_since(self.now))
            // sleep less by last frame's overhead
            .saturating_sub(self.last_overhead);
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
        let new_now = Instant::now();
        self.last_overhead = new_now.duration_since(current).saturating_sub(remaining);

        self.last_dt = new_now.duration_since(self.now);
        self.now = new_now;
        self.last_dt
    }

    /// Duration of the last frame.
    pub fn dt(&self) -> Duration {
        self.last_dt
    }

    /// Measured frame rate of the last frame, 0 before the first tick.
    pub fn fps(&self) -> f64 {
        let secs = self.last_dt.as_secs_f64();
        if secs > 0.0 { 1.0 / secs } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_waits_for_frame() {
        let mut clock = Clock::new();
        assert_eq!(clock.fps(), 0.0);
        let dt = clock.tick(50.0);
        assert!(dt >= Duration::from_millis(15), "{dt:?}");
        assert!(clock.fps() > 0.0 && clock.fps() <= 70.0);
    }

    #[test]
    fn test_unlimited_does_not_sleep() {
        let mut clock = Clock::new();
        let dt = clock.tick(0.0);
        assert!(dt < Duration::from_millis(50));
    }
}
