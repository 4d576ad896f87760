//! stress: CPU load generator

use crate::adapter::command::{ArgvBuilder, CommandSpec};
use crate::adapter::entities::{AdapterDescriptor, ParamKind, ParamSpec};
use crate::adapter::params::ParameterSet;
use crate::adapter::scanner::scan;
use crate::adapter::traits::BenchmarkAdapter;
use crate::adapter::value_objects::ParsedMetrics;
use crate::core::error::{AdapterError, ParseFailure};

use super::hogs::HogReportScanner;

pub const ID: &str = "stress";
const PROGRAM: &str = "stress";

pub struct StressAdapter {
    descriptor: AdapterDescriptor,
}

impl StressAdapter {
    pub fn new() -> Self {
        let descriptor = AdapterDescriptor::new(ID, "CPU load generator (stress)")
            .with_parameter(
                ParamSpec::new("cpu", "Number of workers spinning on sqrt()", true)
                    .with_kind(ParamKind::Integer)
                    .with_range(1, 65_536),
            )
            .with_parameter(
                ParamSpec::new("timeout", "Seconds to run", true)
                    .with_kind(ParamKind::Integer)
                    .with_range(1, i64::from(u32::MAX)),
            )
            .with_common_parameters();

        Self { descriptor }
    }
}

impl Default for StressAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkAdapter for StressAdapter {
    fn descriptor(&self) -> &AdapterDescriptor {
        &self.descriptor
    }

    fn build(&self, params: &ParameterSet) -> Result<CommandSpec, AdapterError> {
        Ok(ArgvBuilder::new(ID, PROGRAM, params)
            .sep_required("--cpu", "cpu")?
            .sep_required("--timeout", "timeout")?
            .redirect_dest()
            .build())
    }

    fn parse(&self, text: &str) -> Result<ParsedMetrics, ParseFailure> {
        scan(HogReportScanner::new(), text)
    }
}
