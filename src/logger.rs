//! Log sink capability injected into the session manager

use tracing::{error, info};

/// Message sink the session manager reports through
///
/// Implementations are fire-and-forget and must not panic; the manager
/// shares the sink and never closes it.
pub trait Logger: Send + Sync {
    /// Record an informational message
    fn info(&self, message: &str);

    /// Record an error message
    fn error(&self, message: &str);
}

/// Logger backed by the `tracing` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        info!("{message}");
    }

    fn error(&self, message: &str) {
        error!("{message}");
    }
}
