use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic elapsed-time source.
///
/// A clock is started once and never reset. Before `start()` the elapsed time is 0.
pub trait Clock {
    /// Begins timing. Calling this twice is not guarded.
    fn start(&mut self);

    /// Seconds elapsed since `start()`. Never decreases while running.
    fn elapsed_seconds(&self) -> f64;

    fn is_running(&self) -> bool;
}

/// Wall clock backed by `Instant`.
#[derive(Debug, Default, Clone)]
pub struct Stopwatch {
    started: Option<Instant>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for Stopwatch {
    fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    fn elapsed_seconds(&self) -> f64 {
        self.started
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn is_running(&self) -> bool {
        self.started.is_some()
    }
}

/// Clock advanced by hand.
///
/// Clones share the same time value, so a test can keep one handle and give the
/// other to the engine.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    elapsed: Rc<Cell<f64>>,
    running: Rc<Cell<bool>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `seconds`. Negative values are ignored.
    pub fn advance(&self, seconds: f64) {
        if seconds > 0.0 {
            self.elapsed.set(self.elapsed.get() + seconds);
        }
    }

    /// Sets the absolute elapsed time. Values behind the current time are ignored.
    pub fn set(&self, seconds: f64) {
        if seconds > self.elapsed.get() {
            self.elapsed.set(seconds);
        }
    }
}

impl Clock for ManualClock {
    fn start(&mut self) {
        self.running.set(true);
    }

    fn elapsed_seconds(&self) -> f64 {
        if self.running.get() { self.elapsed.get() } else { 0.0 }
    }

    fn is_running(&self) -> bool {
        self.running.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopwatch_reports_zero_before_start() {
        let sw = Stopwatch::new();
        assert!(!sw.is_running());
        assert_eq!(sw.elapsed_seconds(), 0.0);
    }

    #[test]
    fn stopwatch_is_monotonic() {
        let mut sw = Stopwatch::new();
        sw.start();
        let mut last = sw.elapsed_seconds();
        for _ in 0..1000 {
            let now = sw.elapsed_seconds();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn manual_clock_ignores_backwards_moves() {
        let mut clock = ManualClock::new();
        clock.start();
        clock.set(2.0);
        clock.set(1.0);
        clock.advance(-5.0);
        assert_eq!(clock.elapsed_seconds(), 2.0);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let handle = ManualClock::new();
        let mut engine_side = handle.clone();
        engine_side.start();
        handle.advance(0.5);
        assert_eq!(engine_side.elapsed_seconds(), 0.5);
    }

    #[test]
    fn manual_clock_is_zero_until_started() {
        let clock = ManualClock::new();
        clock.advance(3.0);
        assert_eq!(clock.elapsed_seconds(), 0.0);
    }
}
