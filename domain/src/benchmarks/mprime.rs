//! mprime: Prime95 torture test
//!
//! mprime runs until interrupted, so it is started under `timeout`, which
//! delivers SIGINT after the requested duration. `--preserve-status` keeps
//! mprime's own exit status.

use regex::Regex;
use std::sync::LazyLock;

use crate::adapter::command::{ArgvBuilder, CommandSpec};
use crate::adapter::entities::{AdapterDescriptor, ParamKind, ParamSpec};
use crate::adapter::params::ParameterSet;
use crate::adapter::scanner::{LineScanner, scan};
use crate::adapter::traits::BenchmarkAdapter;
use crate::adapter::value_objects::ParsedMetrics;
use crate::core::error::{AdapterError, ParseFailure};

pub const ID: &str = "mprime";
const PROGRAM: &str = "mprime";
const TIMEOUT_PROGRAM: &str = "timeout";

const TIMEOUT: &str = "timeout";
const UNIT: &str = "unit";

static SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\w* completed (\d+) .*? - (\d+) \w*, (\d+) \w*").expect("summary pattern compiles")
});

pub struct MprimeAdapter {
    descriptor: AdapterDescriptor,
}

impl MprimeAdapter {
    pub fn new() -> Self {
        let descriptor = AdapterDescriptor::new(ID, "Prime95 torture test (mprime)")
            .with_parameter(
                ParamSpec::new(TIMEOUT, "How long to run before interrupting", true)
                    .with_kind(ParamKind::Integer)
                    .with_range(1, i64::from(u32::MAX)),
            )
            .with_parameter(
                ParamSpec::new(UNIT, "Unit of the timeout", false)
                    .with_choices(["s", "m", "h", "d"])
                    .with_default("s"),
            )
            .with_common_parameters();

        Self { descriptor }
    }
}

impl Default for MprimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkAdapter for MprimeAdapter {
    fn descriptor(&self) -> &AdapterDescriptor {
        &self.descriptor
    }

    fn build(&self, params: &ParameterSet) -> Result<CommandSpec, AdapterError> {
        let builder = ArgvBuilder::new(ID, PROGRAM, params);
        let duration = format!("{}{}", builder.require(TIMEOUT)?, builder.require(UNIT)?);

        Ok(builder
            .wrapped_by([
                TIMEOUT_PROGRAM,
                "--preserve-status",
                "-s",
                "SIGINT",
                duration.as_str(),
            ])
            .arg("-t")
            .redirect_dest()
            .build())
    }

    fn parse(&self, text: &str) -> Result<ParsedMetrics, ParseFailure> {
        scan(SummaryScanner::default(), text)
    }
}

/// Sums test, error and warning counts over every summary line.
#[derive(Debug, Default)]
struct SummaryScanner {
    matched: bool,
    tests: i64,
    errors: i64,
    warnings: i64,
}

impl LineScanner for SummaryScanner {
    fn feed(&mut self, line_no: usize, line: &str) -> Result<(), ParseFailure> {
        for caps in SUMMARY.captures_iter(line) {
            let count = |index: usize| {
                caps[index].parse::<i64>().map_err(|e| {
                    ParseFailure::at_line(line_no, format!("bad count '{}': {}", &caps[index], e))
                })
            };
            self.tests += count(1)?;
            self.errors += count(2)?;
            self.warnings += count(3)?;
            self.matched = true;
        }
        Ok(())
    }

    fn finish(self) -> Result<ParsedMetrics, ParseFailure> {
        if !self.matched {
            return Err(ParseFailure::new(
                "no 'completed N tests - N errors, N warnings' summary found",
            ));
        }
        Ok(ParsedMetrics::new()
            .with("total_tests", self.tests)
            .with("total_errors", self.errors)
            .with("total_warnings", self.warnings))
    }
}
