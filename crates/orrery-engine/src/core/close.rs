use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown request shared between the engine and its collaborators.
///
/// Cloning yields another handle to the same flag. The flag is monotonic: once
/// requested it stays set for the rest of the run. The engine reads it once at
/// the top of every frame, so a request made mid-frame lets that frame finish.
#[derive(Debug, Clone, Default)]
pub struct CloseSignal {
    requested: Arc<AtomicBool>,
}

impl CloseSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        if !self.requested.swap(true, Ordering::AcqRel) {
            log::debug!("application close requested");
        }
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}
