use glam::{Mat4, Vec3};

/// Projection kind used by `Camera3D`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// Camera state consumed by the backend when entering 3D mode.
///
/// `fovy` is the vertical field of view in degrees for perspective cameras and
/// the visible height in world units for orthographic ones.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fovy: f32,
    pub projection: Projection,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 10.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 45.0,
            projection: Projection::Perspective,
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

impl Camera3D {
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Self::default()
        }
    }

    /// Unit vector from the camera toward its target. Falls back to -Z when degenerate.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh(self.fovy.to_radians(), aspect, self.znear, self.zfar)
            }
            Projection::Orthographic => {
                let half_h = self.fovy * 0.5;
                let half_w = half_h * aspect;
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, self.znear, self.zfar)
            }
        }
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view()
    }
}
