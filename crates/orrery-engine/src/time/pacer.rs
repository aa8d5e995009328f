use std::time::{Duration, Instant};

/// Caps the frame rate by sleeping out the rest of each frame budget.
///
/// Backends call `wait()` once per presented frame. A target of 0 fps disables
/// the cap.
#[derive(Debug, Clone, Default)]
pub struct FramePacer {
    target: Option<Duration>,
    last_present: Option<Instant>,
}

impl FramePacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.target = target_frame_duration(fps);
    }

    pub fn target(&self) -> Option<Duration> {
        self.target
    }

    /// Sleeps until the current frame budget is used up, then starts the next one.
    pub fn wait(&mut self) {
        if let Some(last) = self.last_present {
            let sleep = compute_sleep(last.elapsed(), self.target);
            if sleep > Duration::ZERO {
                std::thread::sleep(sleep);
            }
        }
        self.last_present = Some(Instant::now());
    }
}

fn target_frame_duration(fps: u32) -> Option<Duration> {
    (fps > 0).then(|| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(t) => t.saturating_sub(elapsed),
        None => Duration::ZERO,
    }
}
