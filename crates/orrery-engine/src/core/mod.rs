//! Core engine-facing contracts and the loop controller.
//!
//! This module defines the stable interface between the backend and the
//! scenes it drives: the `Engine` state machine, the per-frame contexts handed
//! to scenes, the close signal, and the error taxonomy.

mod close;
mod config;
mod ctx;
mod engine;
mod error;

pub use close::CloseSignal;
pub use config::{EngineConfig, GridConfig};
pub use ctx::{DrawCtx, UpdateCtx};
pub use engine::{Engine, EngineState, FrameStatus};
pub use error::{EngineError, RegistryError, ScenePhase};
