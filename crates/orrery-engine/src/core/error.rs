use std::fmt;

use thiserror::Error;

use super::engine::EngineState;

/// Scene registry access failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("scene index {index} out of range (registry holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no current scene selected")]
    NoCurrentScene,

    #[error("scene registry is full ({capacity} scenes)")]
    CapacityExceeded { capacity: usize },
}

/// Scene lifecycle hook that produced an error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ScenePhase {
    Start,
    Update,
    UpdateUi,
    Draw,
    DrawUi,
    End,
}

impl fmt::Display for ScenePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScenePhase::Start => "start",
            ScenePhase::Update => "update",
            ScenePhase::UpdateUi => "update_ui",
            ScenePhase::Draw => "draw",
            ScenePhase::DrawUi => "draw_ui",
            ScenePhase::End => "end",
        })
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// Backend or window initialization failed; the engine never reached `Running`.
    #[error("engine startup failed")]
    Startup(#[source] anyhow::Error),

    #[error("engine already started")]
    AlreadyStarted,

    #[error("engine is not running (state: {0:?})")]
    NotRunning(EngineState),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("scene {phase} failed")]
    Scene {
        phase: ScenePhase,
        #[source]
        source: anyhow::Error,
    },

    #[error("backend failure")]
    Backend(#[source] anyhow::Error),
}

impl EngineError {
    pub(crate) fn scene(phase: ScenePhase) -> impl FnOnce(anyhow::Error) -> EngineError {
        move |source| EngineError::Scene { phase, source }
    }
}
