/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time elapsed since the previous frame, in seconds.
    pub dt: f32,

    /// Clock reading taken at the tick, in seconds since the clock started.
    pub now: f64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Turns successive clock readings into `FrameTime` snapshots.
///
/// The first tick measures against a previous reading of 0, so its delta is the
/// time elapsed since the clock started.
///
/// Readings stay in `f64`; only the delta is narrowed to `f32`.
///
/// Delta time is only clamped when a maximum is configured; a reading behind the
/// previous one yields a zero delta.
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    last_time: f64,
    frame_index: u64,
    max_dt: Option<f32>,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a timer that caps delta time at `max_dt` seconds.
    ///
    /// Useful to keep simulations stable after a debugger pause or a long stall.
    pub fn with_max_delta(max_dt: f32) -> Self {
        debug_assert!(max_dt > 0.0);
        Self {
            max_dt: Some(max_dt),
            ..Self::default()
        }
    }

    /// Reading recorded by the previous tick.
    pub fn last_time(&self) -> f64 {
        self.last_time
    }

    /// Advances the timer to `current` seconds and returns a new `FrameTime`.
    pub fn tick(&mut self, current: f64) -> FrameTime {
        let mut dt = (current - self.last_time).max(0.0) as f32;
        if let Some(max) = self.max_dt {
            dt = dt.min(max);
        }

        self.last_time = current;

        let ft = FrameTime {
            dt,
            now: current,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_measures_from_zero() {
        let mut t = FrameTimer::new();
        let ft = t.tick(0.25);
        assert_eq!(ft.dt, 0.25);
        assert_eq!(ft.frame_index, 0);
    }

    #[test]
    fn delta_is_difference_of_readings() {
        let mut t = FrameTimer::new();
        let readings = [0.016, 0.033, 0.050, 0.100, 0.101];
        let mut prev = 0.0;
        for (i, now) in readings.into_iter().enumerate() {
            let ft = t.tick(now);
            assert_eq!(ft.dt, (now - prev) as f32);
            assert_eq!(ft.frame_index, i as u64);
            prev = now;
        }
    }

    #[test]
    fn repeated_reading_gives_zero_delta() {
        let mut t = FrameTimer::new();
        t.tick(1.0);
        assert_eq!(t.tick(1.0).dt, 0.0);
    }

    #[test]
    fn backwards_reading_never_goes_negative() {
        let mut t = FrameTimer::new();
        t.tick(1.0);
        assert_eq!(t.tick(0.5).dt, 0.0);
    }

    #[test]
    fn max_delta_clamps_long_stalls() {
        let mut t = FrameTimer::with_max_delta(0.25);
        assert_eq!(t.tick(3.0).dt, 0.25);
        assert_eq!(t.last_time(), 3.0);
        assert!((t.tick(3.1).dt - 0.1).abs() < 1e-6);
    }

    #[test]
    fn deltas_stay_precise_after_long_uptime() {
        let base = 40.0 * 3600.0;
        let mut t = FrameTimer::new();
        t.tick(base);
        for i in 1..=6 {
            let dt = t.tick(base + i as f64 / 144.0).dt;
            assert!((dt - 1.0 / 144.0).abs() < 1e-6, "frame {i}: dt = {dt}");
        }
    }
}
