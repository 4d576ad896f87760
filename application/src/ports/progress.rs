//! Progress notification port
//!
//! Defines the interface for reporting progress while a benchmark runs.

use benchwrap_domain::CommandSpec;

/// Callback for progress updates during a benchmark run
///
/// Implementations live in the presentation layer (e.g. a terminal spinner).
/// All methods have empty defaults.
pub trait RunProgressNotifier: Send + Sync {
    /// Called once the command has been validated and built
    fn on_command_built(&self, _adapter: &str, _spec: &CommandSpec) {}

    /// Called right before the child process is started
    fn on_run_start(&self, _adapter: &str, _command_line: &str) {}

    /// Called when the child process has finished (successfully or not)
    fn on_run_complete(&self, _adapter: &str, _success: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoRunProgress;

impl RunProgressNotifier for NoRunProgress {}
