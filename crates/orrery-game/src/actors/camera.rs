use glam::{Mat4, Vec3};
use orrery_engine::render::Camera3D;
use orrery_engine::scene::{Actor, Transform};

/// Offset from the followed actor: above and behind it.
const FOLLOW_OFFSET: Vec3 = Vec3::new(0.0, 3.0, -6.0);

/// Third-person camera. Attach it as a child of the actor it should follow; it
/// always looks back at its parent's origin.
pub struct CameraRig {
    transform: Transform,
    fovy: f32,
}

impl CameraRig {
    pub fn behind() -> Self {
        Self {
            transform: Transform::from_translation(FOLLOW_OFFSET),
            fovy: 60.0,
        }
    }
}

impl Actor for CameraRig {
    fn name(&self) -> &str {
        "camera"
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn camera(&self, world: &Mat4) -> Option<Camera3D> {
        let position = world.w_axis.truncate();
        let target = world.transform_point3(-self.transform.translation);
        Some(Camera3D {
            fovy: self.fovy,
            ..Camera3D::looking_at(position, target)
        })
    }
}
