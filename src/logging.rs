//! Subscriber setup for binaries and tests embedding the engine.
//!
//! The library itself only emits `tracing` events.
use tracing_subscriber::{fmt, EnvFilter};

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter`. Returns false when a global subscriber already exists.
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
