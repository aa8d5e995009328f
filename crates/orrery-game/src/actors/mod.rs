mod camera;
mod enemy;
mod player;

pub use camera::CameraRig;
pub use enemy::Enemy;
pub use player::Player;
