use anyhow::Result;
use glam::Vec3;
use orrery_engine::backend::DisplaySize;
use orrery_engine::scene::{ActorScene, Scene, Transform};

use crate::actors::{CameraRig, Enemy, Player};

pub const PLAYER_START: Vec3 = Vec3::new(0.0, 1.0, 0.0);
pub const ENEMY_START: Vec3 = Vec3::new(0.0, 1.0, 3.0);

/// Initial world: a player, a camera rig riding on it, and one enemy hunting it.
pub fn build(size: DisplaySize) -> Result<Box<dyn Scene>> {
    log::info!("building world for {}x{}", size.width, size.height);
    Ok(Box::new(populate()?))
}

fn populate() -> Result<ActorScene> {
    let mut scene = ActorScene::new();

    let player = scene.add_actor(Player::new(Transform::from_translation(PLAYER_START)));
    let camera = scene.add_actor(CameraRig::behind());
    scene.add_child(player, camera)?;
    scene.add_actor(Enemy::new(Transform::from_translation(ENEMY_START), player));

    Ok(scene)
}
