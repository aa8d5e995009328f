use anyhow::Result;

use crate::core::{DrawCtx, UpdateCtx};
use crate::render::Camera3D;

/// Lifecycle contract between the engine and a scene.
///
/// Call order per run: `start` once, then per frame `update`, `update_ui`,
/// `draw`, `draw_ui`, and finally `end` once. Errors are not handled by the
/// engine; they stop the loop.
pub trait Scene {
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn update(&mut self, ctx: &mut UpdateCtx<'_>) -> Result<()>;

    fn update_ui(&mut self, ctx: &mut UpdateCtx<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    fn draw(&self, ctx: &mut DrawCtx<'_>) -> Result<()>;

    fn draw_ui(&self, ctx: &mut DrawCtx<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        Ok(())
    }

    /// Camera the engine enters 3D mode with. `None` uses the engine's fallback camera.
    fn camera(&self) -> Option<Camera3D> {
        None
    }
}
