use anyhow::Result;
use glam::{Mat4, Quat, Vec3};

use crate::core::{DrawCtx, UpdateCtx};
use crate::render::Camera3D;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
enum Layer {
    World,
    Ui,
}

/// Position of an actor inside its `ActorScene`.
///
/// World actors and UI actors are numbered separately; an id from one list
/// never resolves to an actor of the other.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ActorId {
    index: usize,
    layer: Layer,
}

impl ActorId {
    pub(crate) fn world(index: usize) -> Self {
        Self { index, layer: Layer::World }
    }

    pub(crate) fn ui(index: usize) -> Self {
        Self { index, layer: Layer::Ui }
    }

    #[inline]
    pub fn index(self) -> usize {
        self.index
    }

    #[inline]
    pub fn is_ui(self) -> bool {
        self.layer == Layer::Ui
    }
}

/// Local translation/rotation/scale. Forward is local +Z.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.translation += delta;
    }

    /// Rotates so that forward points along `direction`. Zero directions are ignored.
    pub fn face(&mut self, direction: Vec3) {
        if let Some(dir) = direction.try_normalize() {
            self.rotation = Quat::from_rotation_arc(Vec3::Z, dir);
        }
    }
}

/// Transforms visible to actors during one update pass.
///
/// `world` holds every world actor's world transform and `ui` every UI actor's
/// local transform, both as of the start of the pass.
#[derive(Copy, Clone)]
pub(crate) struct Snapshot<'a> {
    pub world: &'a [Mat4],
    pub ui: &'a [Mat4],
}

/// Per-actor view of the update step.
pub struct ActorCtx<'a, 'f> {
    pub frame: &'a mut UpdateCtx<'f>,
    pub id: ActorId,
    snapshot: Snapshot<'a>,
}

impl<'a, 'f> ActorCtx<'a, 'f> {
    pub(crate) fn new(frame: &'a mut UpdateCtx<'f>, id: ActorId, snapshot: Snapshot<'a>) -> Self {
        Self { frame, id, snapshot }
    }

    #[inline]
    pub fn dt(&self) -> f32 {
        self.frame.dt()
    }

    pub fn world_transform(&self, id: ActorId) -> Option<Mat4> {
        let list = match id.layer {
            Layer::World => self.snapshot.world,
            Layer::Ui => self.snapshot.ui,
        };
        list.get(id.index).copied()
    }

    pub fn world_position(&self, id: ActorId) -> Option<Vec3> {
        self.world_transform(id).map(|m| m.w_axis.truncate())
    }
}

/// Something living in an `ActorScene`.
pub trait Actor {
    fn name(&self) -> &str;

    fn transform(&self) -> &Transform;

    fn transform_mut(&mut self) -> &mut Transform;

    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn update(&mut self, ctx: &mut ActorCtx<'_, '_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Records draw commands. `world` is this actor's world transform.
    fn draw(&self, world: &Mat4, ctx: &mut DrawCtx<'_>) {
        let _ = (world, ctx);
    }

    fn end(&mut self) -> Result<()> {
        Ok(())
    }

    /// Camera this actor provides, if it is one.
    fn camera(&self, world: &Mat4) -> Option<Camera3D> {
        let _ = world;
        None
    }
}
