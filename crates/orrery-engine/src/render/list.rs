use glam::{Mat4, Quat, Vec3};

use crate::paint::Color;

/// A single recorded 3D draw command.
///
/// Solid shapes are expressed as a unit shape (cube of edge 1, sphere of radius 1,
/// both centered at the origin) under a world transform.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Line { from: Vec3, to: Vec3, color: Color },
    Cube { transform: Mat4, color: Color },
    Sphere { transform: Mat4, color: Color },
}

/// Recorded draw stream for a frame.
///
/// `push()` is O(1); `clear()` keeps the allocation for reuse on the next frame.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawCmd>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn items(&self) -> &[DrawCmd] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn push(&mut self, cmd: DrawCmd) {
        self.items.push(cmd);
    }

    pub fn line(&mut self, from: Vec3, to: Vec3, color: Color) {
        self.push(DrawCmd::Line { from, to, color });
    }

    /// Axis-aligned cube centered at `center`.
    pub fn cube(&mut self, center: Vec3, size: Vec3, color: Color) {
        let transform = Mat4::from_scale_rotation_translation(size, Quat::IDENTITY, center);
        self.push(DrawCmd::Cube { transform, color });
    }

    pub fn sphere(&mut self, center: Vec3, radius: f32, color: Color) {
        let transform =
            Mat4::from_scale_rotation_translation(Vec3::splat(radius), Quat::IDENTITY, center);
        self.push(DrawCmd::Sphere { transform, color });
    }
}
