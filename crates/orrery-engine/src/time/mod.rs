//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the backend.
//! Intended usage:
//! - one `Clock`, started once when the engine starts
//! - one `FrameTimer`, fed the clock's elapsed seconds once per frame
//! - one `FramePacer` inside a backend that caps the frame rate

mod clock;
mod frame_clock;
mod pacer;

pub use clock::{Clock, ManualClock, Stopwatch};
pub use frame_clock::{FrameTime, FrameTimer};
pub use pacer::FramePacer;
