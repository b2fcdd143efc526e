//! Process-level logging initialization

use tracing_subscriber::EnvFilter;

/// Initialize logging based on environment variables
///
/// Defaults to INFO level, can be overridden by the `RUST_LOG`
/// environment variable. Safe to call more than once; later calls are
/// no-ops, so tests and embedding binaries can both call it freely.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dbsession=info,warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}
