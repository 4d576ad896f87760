//! multichase: memory latency and bandwidth suite
//!
//! The suite ships three binaries side by side; the `benchmark` parameter
//! picks which one runs. They expect to be started from their install
//! directory.

use crate::adapter::command::{ArgvBuilder, CommandSpec};
use crate::adapter::entities::{AdapterDescriptor, ParamSpec};
use crate::adapter::params::ParameterSet;
use crate::adapter::scanner::{LineScanner, scan};
use crate::adapter::traits::BenchmarkAdapter;
use crate::adapter::value_objects::ParsedMetrics;
use crate::core::error::{AdapterError, ParseFailure};

pub const ID: &str = "multichase";

const BENCHMARK: &str = "benchmark";
const BEST_LATENCY: &str = "Best Latency Time";

/// Which binary of the suite to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Multichase,
    Pingpong,
    Fairness,
}

impl Variant {
    fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("pingpong") => Variant::Pingpong,
            Some("fairness") => Variant::Fairness,
            _ => Variant::Multichase,
        }
    }

    fn program(&self) -> &'static str {
        match self {
            Variant::Multichase => "multichase",
            Variant::Pingpong => "pingpong",
            Variant::Fairness => "fairness",
        }
    }
}

pub struct MultichaseAdapter {
    descriptor: AdapterDescriptor,
}

impl MultichaseAdapter {
    pub fn new() -> Self {
        let descriptor = AdapterDescriptor::new(ID, "Memory latency suite (multichase)")
            .with_parameter(
                ParamSpec::new(BENCHMARK, "Binary of the suite to run", false)
                    .with_choices(["multichase", "pingpong", "fairness"])
                    .with_default("multichase"),
            )
            .with_parameter(ParamSpec::new("memory", "Arena size (e.g. 256m)", false))
            .with_parameter(ParamSpec::new("stride", "Stride between chased pointers", false))
            .with_parameter(ParamSpec::new("threads", "Number of chasing threads", false))
            .with_parameter(ParamSpec::new("samples", "Number of 0.5 s samples", false))
            .with_common_parameters();

        Self { descriptor }
    }
}

impl Default for MultichaseAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkAdapter for MultichaseAdapter {
    fn descriptor(&self) -> &AdapterDescriptor {
        &self.descriptor
    }

    fn build(&self, params: &ParameterSet) -> Result<CommandSpec, AdapterError> {
        let variant = Variant::from_param(params.get_str(BENCHMARK));
        let builder = ArgvBuilder::new(ID, variant.program(), params).in_program_dir();

        let builder = match variant {
            Variant::Multichase => builder
                .sep_optional("-m", "memory")
                .sep_optional("-s", "stride")
                .sep_optional("-t", "threads")
                .sep_optional("-n", "samples")
                .arg("-v"),
            Variant::Pingpong => builder.arg("-u"),
            Variant::Fairness => builder,
        };

        Ok(builder.redirect_dest().build())
    }

    fn parse(&self, text: &str) -> Result<ParsedMetrics, ParseFailure> {
        scan(LookBehindScanner::default(), text)
    }
}

/// Remembers the last two non-empty lines.
#[derive(Debug, Default)]
struct LookBehindScanner {
    previous: Option<String>,
    current: Option<String>,
}

impl LineScanner for LookBehindScanner {
    fn feed(&mut self, _line_no: usize, line: &str) -> Result<(), ParseFailure> {
        let line = line.trim();
        if !line.is_empty() {
            self.previous = self.current.replace(line.to_string());
        }
        Ok(())
    }

    fn finish(self) -> Result<ParsedMetrics, ParseFailure> {
        match self.previous {
            Some(best) => Ok(ParsedMetrics::new().with(BEST_LATENCY, best)),
            None => Err(ParseFailure::new("expected at least two non-empty lines")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::command::WorkingDir;
    use crate::adapter::traits::build_command;
    use std::path::PathBuf;

    #[test]
    fn test_default_variant_runs_from_install_dir() {
        let params = ParameterSet::new().with("executable", "/opt/multichase");
        let spec = build_command(&MultichaseAdapter::new(), &params).unwrap();
        assert_eq!(spec.program, "multichase");
        assert_eq!(spec.args, vec!["-v"]);
        assert_eq!(spec.working_dir, WorkingDir::ProgramDir);
        assert_eq!(spec.search_dir, Some(PathBuf::from("/opt/multichase")));
    }

    #[test]
    fn test_multichase_flags() {
        let params = ParameterSet::new()
            .with("memory", "256m")
            .with("stride", "128")
            .with("samples", "20")
            .with("dest", "/tmp/mc.out");
        let spec = build_command(&MultichaseAdapter::new(), &params).unwrap();
        assert_eq!(spec.args, vec!["-m", "256m", "-s", "128", "-n", "20", "-v"]);
        assert_eq!(spec.runner_output(), Some(&PathBuf::from("/tmp/mc.out")));
    }

    #[test]
    fn test_pingpong_and_fairness() {
        let adapter = MultichaseAdapter::new();

        let pingpong = ParameterSet::new().with(BENCHMARK, "pingpong").with("memory", "1g");
        let spec = build_command(&adapter, &pingpong).unwrap();
        assert_eq!(spec.program, "pingpong");
        assert_eq!(spec.args, vec!["-u"]);

        let fairness = ParameterSet::new().with(BENCHMARK, "fairness");
        let spec = build_command(&adapter, &fairness).unwrap();
        assert_eq!(spec.program, "fairness");
        assert!(spec.args.is_empty());
    }

    #[test]
    fn test_explicit_chdir_wins() {
        let params = ParameterSet::new().with("chdir", "/srv/run");
        let spec = build_command(&MultichaseAdapter::new(), &params).unwrap();
        assert_eq!(spec.working_dir, WorkingDir::Explicit(PathBuf::from("/srv/run")));
    }

    #[test]
    fn test_parse_second_to_last_non_empty_line() {
        let text = "nr_samples 20\n 90.412\n\n  88.101  \nmultichase done\n\n";
        let metrics = MultichaseAdapter::new().parse(text).unwrap();
        assert_eq!(metrics.get(BEST_LATENCY).unwrap().as_text(), Some("88.101"));
    }

    #[test]
    fn test_parse_single_line_fails() {
        assert!(MultichaseAdapter::new().parse("88.101\n\n").is_err());
        assert!(MultichaseAdapter::new().parse("").is_err());
    }
}
