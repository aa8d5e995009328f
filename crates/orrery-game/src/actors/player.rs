use anyhow::Result;
use glam::{Mat4, Vec3};
use orrery_engine::input::Key;
use orrery_engine::paint::Color;
use orrery_engine::core::DrawCtx;
use orrery_engine::scene::{Actor, ActorCtx, Transform};

/// Units per second.
const SPEED: f32 = 3.0;
const RADIUS: f32 = 0.5;

/// Keyboard-driven sphere. Moves on the XZ plane; Escape quits.
pub struct Player {
    transform: Transform,
}

impl Player {
    pub fn new(transform: Transform) -> Self {
        Self { transform }
    }

    fn direction(ctx: &ActorCtx<'_, '_>) -> Vec3 {
        let axis = |pos: [Key; 2], neg: [Key; 2]| {
            let down = |keys: [Key; 2]| keys.iter().any(|k| ctx.frame.key_down(*k));
            down(pos) as i32 as f32 - down(neg) as i32 as f32
        };

        let x = axis([Key::A, Key::ArrowLeft], [Key::D, Key::ArrowRight]);
        let z = axis([Key::W, Key::ArrowUp], [Key::S, Key::ArrowDown]);
        Vec3::new(x, 0.0, z).normalize_or_zero()
    }
}

impl Actor for Player {
    fn name(&self) -> &str {
        "player"
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn update(&mut self, ctx: &mut ActorCtx<'_, '_>) -> Result<()> {
        if ctx.frame.key_pressed(Key::Escape) {
            ctx.frame.request_close();
        }

        let dir = Self::direction(ctx);
        self.transform.translate(dir * SPEED * ctx.dt());
        Ok(())
    }

    fn draw(&self, world: &Mat4, ctx: &mut DrawCtx<'_>) {
        ctx.sphere(world.w_axis.truncate(), RADIUS, Color::SKY_BLUE);
    }
}
