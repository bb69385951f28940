//! Logging setup and re-exports

pub use log::{debug, error, info, trace, warn};

/// Initialize env_logger with its default environment configuration
pub fn init() {
    env_logger::init();
}

/// Initialize env_logger with a default level, still overridable via RUST_LOG
pub fn init_with_level(level: log::LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
