//! Windowing/graphics backends.
//!
//! The engine drives a backend through the `Backend` trait only. Two
//! implementations ship with the crate:
//! - `WinitBackend` (in `crate::window`): a real window with a wgpu surface
//! - `HeadlessBackend`: no window; records calls and replays scripted input

mod headless;

pub use headless::{BackendCall, HeadlessBackend};

use anyhow::Result;

use crate::input::InputDevice;
use crate::paint::Color;
use crate::render::{Camera3D, DrawList};

/// Display or window size in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
}

impl DisplaySize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Platform surface the engine renders through.
///
/// Frame calls arrive in a fixed order: `begin_frame`, `begin_3d`,
/// `clear_background`, `draw_grid`, `draw`, `end_3d`, `end_frame`. Input state
/// observed through `InputDevice` is refreshed by `end_frame`.
pub trait Backend: InputDevice {
    /// Size of the primary display.
    fn query_display_size(&mut self) -> Result<DisplaySize>;

    fn create_window(&mut self, size: DisplaySize, title: &str) -> Result<()>;

    fn set_cursor_hidden(&mut self, hidden: bool);

    fn maximize_window(&mut self);

    /// Frame-rate cap applied in `end_frame`. 0 disables it.
    fn set_target_frame_rate(&mut self, fps: u32);

    /// True once the platform asked the window to close.
    fn should_close(&self) -> bool;

    fn begin_frame(&mut self) -> Result<()>;

    fn begin_3d(&mut self, camera: &Camera3D);

    fn clear_background(&mut self, color: Color);

    fn draw_grid(&mut self, cells: u32, spacing: f32);

    fn draw(&mut self, list: &DrawList);

    fn end_3d(&mut self);

    /// Presents the frame, paces it and collects input for the next one.
    fn end_frame(&mut self) -> Result<()>;

    fn toggle_fullscreen(&mut self);

    /// Releases the window. Safe to call more than once.
    fn close_window(&mut self);
}
