//! Adapter traits
//!
//! A [`BenchmarkAdapter`] bundles the schema, command builder and output
//! parser of one tool. All three are pure: no I/O happens here.

use super::command::CommandSpec;
use super::entities::AdapterDescriptor;
use super::params::ParameterSet;
use super::validation::{DefaultParameterValidator, ParameterValidator};
use super::value_objects::ParsedMetrics;
use crate::core::error::{AdapterError, ParseFailure};

/// One wrapped benchmark tool
pub trait BenchmarkAdapter: Send + Sync {
    /// Schema of the tool's parameters
    fn descriptor(&self) -> &AdapterDescriptor;

    /// Turn an already-normalized parameter set into a command.
    ///
    /// Callers go through [`build_command`], which validates first.
    fn build(&self, params: &ParameterSet) -> Result<CommandSpec, AdapterError>;

    /// Extract metrics from captured output text
    fn parse(&self, text: &str) -> Result<ParsedMetrics, ParseFailure>;

    fn id(&self) -> &str {
        &self.descriptor().id
    }
}

/// Validate `params` against the adapter's schema, then build its command.
///
/// Identical inputs always produce an identical [`CommandSpec`].
pub fn build_command(
    adapter: &dyn BenchmarkAdapter,
    params: &ParameterSet,
) -> Result<CommandSpec, AdapterError> {
    let normalized = DefaultParameterValidator.normalize(adapter.descriptor(), params)?;
    adapter.build(&normalized)
}
