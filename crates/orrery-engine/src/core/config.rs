use crate::backend::DisplaySize;
use crate::input::Key;
use crate::paint::Color;
use crate::render::Camera3D;

/// Reference ground grid drawn under every scene.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GridConfig {
    pub cells: u32,
    pub spacing: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cells: 500,
            spacing: 1.0,
        }
    }
}

/// Engine configuration. Everything here is fixed for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub title: String,

    /// Window size used when the backend cannot report the display size.
    pub fallback_size: DisplaySize,

    /// Frame-rate cap enforced by the backend; 0 disables it.
    pub target_fps: u32,

    /// Edge-triggered key that toggles fullscreen.
    pub fullscreen_key: Key,

    pub hide_cursor: bool,
    pub maximize: bool,

    pub clear_color: Color,
    pub grid: GridConfig,

    /// Most buffered keys discarded after each update.
    pub input_drain_limit: usize,

    /// Upper bound on registered scenes; `None` grows without bound.
    pub max_scenes: Option<usize>,

    /// Clamp for delta time in seconds; `None` reports raw clock deltas.
    pub max_delta: Option<f32>,

    /// Camera used when the current scene does not provide one.
    pub fallback_camera: Camera3D,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "orrery".to_string(),
            fallback_size: DisplaySize::new(1280, 720),
            target_fps: 60,
            fullscreen_key: Key::Q,
            hide_cursor: true,
            maximize: true,
            clear_color: Color::DARK_GRAY,
            grid: GridConfig::default(),
            input_drain_limit: 256,
            max_scenes: None,
            max_delta: None,
            fallback_camera: Camera3D::default(),
        }
    }
}
