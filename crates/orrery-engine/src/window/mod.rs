//! Native window backend.
//!
//! Owns the `winit` event loop and window and wires them to the GPU layer and
//! the line renderer.

mod runtime;

pub use runtime::{WinitBackend, WinitConfig};
