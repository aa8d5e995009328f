use std::sync::Once;

use log::LevelFilter;

/// Crates whose info-level output drowns the engine's own lifecycle logs.
const NOISY_CRATES: &[&str] = &["wgpu_core", "wgpu_hal", "naga"];

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "orrery_engine=debug,wgpu_core=warn"). When neither it nor `RUST_LOG` is
/// set, `default_level` applies and GPU stack crates are capped at `warn`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs `env_logger` as the global logger.
///
/// Filter precedence: `config.env_filter`, then `RUST_LOG`, then the default.
/// Later calls are ignored, as is an already-installed foreign logger.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config
            .env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| default_filter(config.default_level));

        let mut builder = env_logger::Builder::new();
        builder
            .parse_filters(&filter)
            .write_style(config.write_style)
            .format_timestamp_millis();

        if builder.try_init().is_ok() {
            log::debug!("logging initialized ({filter})");
        }
    });
}

fn default_filter(level: LevelFilter) -> String {
    let mut filter = level.to_string().to_lowercase();
    let cap = level.min(LevelFilter::Warn).to_string().to_lowercase();
    for name in NOISY_CRATES {
        filter.push_str(&format!(",{name}={cap}"));
    }
    filter
}
