//! Orrery engine crate.
//!
//! A fixed-loop engine that drives one active scene through start, per-frame
//! update/draw and end, on top of a pluggable windowing/graphics backend.

pub mod backend;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;

pub use crate::backend::{Backend, DisplaySize, HeadlessBackend};
pub use crate::core::{CloseSignal, Engine, EngineConfig, EngineError, EngineState};
pub use crate::scene::{Actor, ActorScene, Scene};
pub use crate::window::{WinitBackend, WinitConfig};
