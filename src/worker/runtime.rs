//! Host runtime control signals.

use tracing::info;

/// Signals the worker sends its host runtime during lifecycle events.
///
/// The runtime decides when a new worker version takes over; these two
/// signals ask it to skip the hand-off delays. Both are fire-and-forget:
/// the worker never observes their effect.
pub trait HostRuntime: Send + Sync {
    /// Activate this worker version immediately instead of waiting for the
    /// previous version to stop being used.
    fn skip_waiting(&self);

    /// Route all currently open clients through this worker immediately
    /// instead of waiting for a reload.
    fn claim_clients(&self);
}

/// Runtime handle for a standalone host: the signals are logged and
/// otherwise inert.
pub struct LoggingRuntime;

impl HostRuntime for LoggingRuntime {
    fn skip_waiting(&self) {
        info!("Requested immediate activation");
    }

    fn claim_clients(&self) {
        info!("Requested control of open clients");
    }
}
