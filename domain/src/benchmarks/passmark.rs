//! PassMark BurnInTest (command-line edition)
//!
//! The report has a result summary with one verdict line per subsystem,
//! followed by a serious-error section listing each failure.

use crate::adapter::command::{ArgvBuilder, CommandSpec, WorkingDir};
use crate::adapter::entities::{AdapterDescriptor, ParamSpec};
use crate::adapter::params::ParameterSet;
use crate::adapter::scanner::{LineScanner, scan};
use crate::adapter::traits::BenchmarkAdapter;
use crate::adapter::value_objects::ParsedMetrics;
use crate::core::error::{AdapterError, ParseFailure};

pub const ID: &str = "passmark";
const PROGRAM: &str = "bit_cmd_line_x64";

const SUMMARY_HEADER: &str = "RESULT SUMMARY";
const ERRORS_HEADER: &str = "SERIOUS ERROR SUMMARY";
const ERROR_MARKER: &str = "SERIOUS:";

/// Subsystem name as printed, and the metric label it is reported under
const SUBSYSTEMS: [(&str, &str); 4] = [
    ("CPU", "cpu"),
    ("Memory", "memory"),
    ("Disk", "disk"),
    ("Network", "network"),
];

pub struct PassmarkAdapter {
    descriptor: AdapterDescriptor,
}

impl PassmarkAdapter {
    pub fn new() -> Self {
        let descriptor = AdapterDescriptor::new(ID, "PassMark BurnInTest")
            .with_parameter(ParamSpec::new("cfg", "BurnInTest configuration file", true))
            .with_common_parameters();

        Self { descriptor }
    }
}

impl Default for PassmarkAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkAdapter for PassmarkAdapter {
    fn descriptor(&self) -> &AdapterDescriptor {
        &self.descriptor
    }

    fn build(&self, params: &ParameterSet) -> Result<CommandSpec, AdapterError> {
        let mut spec = ArgvBuilder::new(ID, PROGRAM, params)
            .sep_required("-C", "cfg")?
            .redirect_dest()
            .build();

        // With `chdir` and no explicit location, the binary lives in that directory.
        if spec.search_dir.is_none()
            && let WorkingDir::Explicit(dir) = &spec.working_dir
        {
            spec.search_dir = Some(dir.clone());
        }
        Ok(spec)
    }

    fn parse(&self, text: &str) -> Result<ParsedMetrics, ParseFailure> {
        scan(ReportScanner::default(), text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Seeking,
    InSummary,
    InErrors,
}

#[derive(Debug, Default)]
struct ReportScanner {
    phase: Phase,
    verdicts: Vec<(&'static str, &'static str)>,
    errors: Vec<String>,
}

impl ReportScanner {
    fn record_verdict(&mut self, label: &'static str, verdict: &'static str) {
        match self.verdicts.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = verdict,
            None => self.verdicts.push((label, verdict)),
        }
    }
}

/// True when `PASS` appears as a whole word on the line.
fn passed(line: &str) -> bool {
    line.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|word| word == "PASS")
}

impl LineScanner for ReportScanner {
    fn feed(&mut self, _line_no: usize, line: &str) -> Result<(), ParseFailure> {
        if line.contains(ERRORS_HEADER) {
            self.phase = Phase::InErrors;
            return Ok(());
        }
        if line.contains(SUMMARY_HEADER) {
            self.phase = Phase::InSummary;
            return Ok(());
        }

        match self.phase {
            Phase::Seeking => {}
            Phase::InSummary => {
                let verdict = if passed(line) { "PASS" } else { "FAIL" };
                for (name, label) in SUBSYSTEMS {
                    if line.contains(name) {
                        self.record_verdict(label, verdict);
                    }
                }
            }
            Phase::InErrors => {
                if line.contains(ERROR_MARKER) {
                    self.errors.push(line.to_string());
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<ParsedMetrics, ParseFailure> {
        if self.verdicts.is_empty() && self.errors.is_empty() {
            return Err(ParseFailure::new(
                "no subsystem verdicts or serious errors found",
            ));
        }
        let mut metrics = ParsedMetrics::new();
        for (label, verdict) in self.verdicts {
            metrics.insert(label, verdict);
        }
        let total = self.errors.len() as i64;
        metrics.insert("errors", self.errors);
        metrics.insert("total_errors", total);
        Ok(metrics)
    }
}
