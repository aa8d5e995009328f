//! 3D drawing collaborators.
//!
//! Scenes record `DrawCmd`s into a `DrawList`; backends turn them into line
//! geometry and issue GPU commands via wgpu.
//!
//! Convention:
//! - world space is right-handed, +Y up
//! - the vertex shader applies the camera's view-projection matrix

mod camera;
mod ctx;
mod line_renderer;
pub mod lines;
mod list;

pub use camera::{Camera3D, Projection};
pub use ctx::{RenderCtx, RenderTarget};
pub use line_renderer::LineRenderer;
pub use lines::LineVertex;
pub use list::{DrawCmd, DrawList};
