//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Backends translate platform events into `InputEvent`s and feed them to a
//! `Keyboard`, which answers the engine's `InputDevice` queries.

mod device;
mod frame;
mod keyboard;
pub(crate) mod platform;
mod state;
mod types;

pub use device::InputDevice;
pub use keyboard::{Keyboard, DEFAULT_KEY_BUFFER};
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState, Modifiers};
