//! Logging setup.
//!
//! The crate logs through the `log` facade; binaries install `env_logger` once
//! via `init_logging`.

mod init;

pub use init::{LoggingConfig, init_logging};
