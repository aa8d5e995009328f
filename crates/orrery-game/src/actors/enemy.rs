use anyhow::Result;
use glam::{Mat4, Vec3};
use orrery_engine::core::DrawCtx;
use orrery_engine::paint::Color;
use orrery_engine::scene::{Actor, ActorCtx, ActorId, Transform};

const SPEED: f32 = 2.0;
const SIGHT_DISTANCE: f32 = 3.0;
/// Half-angle of the view cone, in degrees.
const VIEW_ANGLE: f32 = 40.0;
const SIZE: f32 = 1.0;

/// Cube that chases `target` while it stands inside its view cone.
pub struct Enemy {
    transform: Transform,
    target: ActorId,
    sees_target: bool,
}

impl Enemy {
    pub fn new(transform: Transform, target: ActorId) -> Self {
        Self {
            transform,
            target,
            sees_target: false,
        }
    }

    pub fn sees_target(&self) -> bool {
        self.sees_target
    }

    fn can_see(&self, to_target: Vec3) -> bool {
        let distance = to_target.length();
        if distance > SIGHT_DISTANCE {
            return false;
        }
        if distance <= f32::EPSILON {
            return true;
        }
        self.transform.forward().angle_between(to_target).to_degrees() <= VIEW_ANGLE
    }
}

impl Actor for Enemy {
    fn name(&self) -> &str {
        "enemy"
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn update(&mut self, ctx: &mut ActorCtx<'_, '_>) -> Result<()> {
        let Some(target) = ctx.world_position(self.target) else {
            self.sees_target = false;
            return Ok(());
        };

        let to_target = target - self.transform.translation;
        self.sees_target = self.can_see(to_target);
        if self.sees_target {
            self.transform.face(to_target);
            let step = (SPEED * ctx.dt()).min(to_target.length());
            self.transform.translate(to_target.normalize_or_zero() * step);
        }
        Ok(())
    }

    fn draw(&self, world: &Mat4, ctx: &mut DrawCtx<'_>) {
        let center = world.w_axis.truncate();
        ctx.cube(center, Vec3::splat(SIZE), Color::MAROON);

        let sight = if self.sees_target { Color::RED } else { Color::GOLD };
        ctx.line(center, center + self.transform.forward() * SIGHT_DISTANCE, sight);
    }
}

#[cfg(test)]
mod tests {
    use orrery_engine::core::{CloseSignal, UpdateCtx};
    use orrery_engine::input::Keyboard;
    use orrery_engine::scene::{ActorScene, Scene};
    use orrery_engine::time::FrameTime;

    use super::*;

    struct Dummy(Transform);

    impl Actor for Dummy {
        fn name(&self) -> &str {
            "dummy"
        }

        fn transform(&self) -> &Transform {
            &self.0
        }

        fn transform_mut(&mut self) -> &mut Transform {
            &mut self.0
        }
    }

    fn run(target_at: Vec3, dt: f32) -> Vec3 {
        let mut scene = ActorScene::new();
        let target = scene.add_actor(Dummy(Transform::from_translation(target_at)));
        let enemy = scene.add_actor(Enemy::new(Transform::default(), target));
        scene.start().unwrap();

        let mut keyboard = Keyboard::default();
        let close = CloseSignal::new();
        let mut ctx = UpdateCtx {
            time: FrameTime { dt, now: f64::from(dt), frame_index: 0 },
            input: &mut keyboard,
            close: &close,
        };
        scene.update(&mut ctx).unwrap();
        scene.actor(enemy).unwrap().transform().translation
    }

    #[test]
    fn chases_target_in_front() {
        let pos = run(Vec3::new(0.0, 0.0, 2.0), 0.5);
        assert!((pos - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn ignores_target_behind() {
        assert_eq!(run(Vec3::new(0.0, 0.0, -2.0), 0.5), Vec3::ZERO);
    }

    #[test]
    fn ignores_target_out_of_range() {
        assert_eq!(run(Vec3::new(0.0, 0.0, 10.0), 0.5), Vec3::ZERO);
    }

    #[test]
    fn does_not_overshoot() {
        let pos = run(Vec3::new(0.0, 0.0, 0.5), 1.0);
        assert!((pos - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-5);
    }

    #[test]
    fn turns_toward_target_inside_cone() {
        let mut scene = ActorScene::new();
        let target = scene.add_actor(Dummy(Transform::default()));
        let mut enemy = Enemy::new(Transform::default(), target);
        let off_axis = Vec3::new(1.0, 0.0, 2.0);
        assert!(enemy.can_see(off_axis));
        enemy.transform.face(off_axis);
        assert!((enemy.transform.forward() - off_axis.normalize()).length() < 1e-5);
        assert!(!enemy.sees_target());
    }
}
