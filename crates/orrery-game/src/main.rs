mod actors;
mod world;

use anyhow::Result;
use orrery_engine::logging::{LoggingConfig, init_logging};
use orrery_engine::{Engine, EngineConfig, WinitBackend, WinitConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let backend = WinitBackend::new(WinitConfig::default())?;
    let config = EngineConfig {
        title: "Orrery".to_string(),
        ..EngineConfig::default()
    };

    let mut engine = Engine::new(backend, config);
    engine.run(world::build)?;
    Ok(())
}
