//! Process runner port
//!
//! Defines how the application layer executes a built command.

use benchwrap_domain::{AdapterError, CommandSpec, ExecutionOutcome};

/// Port for executing a [`CommandSpec`] as one child process.
///
/// Implementations block until the child exits and return its captured
/// output. They must:
///
/// - pass tokens to the child discretely, never through a shell
/// - apply the working directory to the child only
/// - report an unresolvable program as [`AdapterError::Resolution`] without spawning
/// - report a non-zero exit or signal termination as [`AdapterError::Execution`]
/// - append stdout to a runner-owned output target only after a successful run
pub trait ProcessRunnerPort: Send + Sync {
    fn run(&self, spec: &CommandSpec) -> Result<ExecutionOutcome, AdapterError>;
}
