//! Scenes and the registry that holds them.
//!
//! The engine only sees the `Scene` lifecycle. `ActorScene` is the stock
//! implementation: an ordered set of actors with parent/child transforms and a
//! separate UI pass.

mod actor;
mod actor_scene;
mod lifecycle;
mod registry;

pub use actor::{Actor, ActorCtx, ActorId, Transform};
pub use actor_scene::ActorScene;
pub use lifecycle::Scene;
pub use registry::SceneRegistry;
