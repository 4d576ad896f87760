//! fio: flexible I/O tester
//!
//! fio writes its own report through `--output`; parsing hands that report
//! back unchanged, as a JSON document when fio was asked for JSON output.

use crate::adapter::command::{ArgvBuilder, CommandSpec};
use crate::adapter::entities::{AdapterDescriptor, ParamKind, ParamSpec};
use crate::adapter::params::ParameterSet;
use crate::adapter::scanner::{LineScanner, scan};
use crate::adapter::traits::BenchmarkAdapter;
use crate::adapter::value_objects::{MetricValue, ParsedMetrics};
use crate::core::error::{AdapterError, ParseFailure};

pub const ID: &str = "fio";
const PROGRAM: &str = "fio";

const RW_MODES: [&str; 7] = [
    "read",
    "write",
    "randread",
    "randwrite",
    "rw",
    "readwrite",
    "randrw",
];

const IO_ENGINES: [&str; 20] = [
    "sync",
    "psync",
    "vsync",
    "libaio",
    "posixaio",
    "solarisaio",
    "windowsaio",
    "mmap",
    "splice",
    "syslet-rw",
    "sg",
    "null",
    "net",
    "netsplice",
    "cpuio",
    "guasi",
    "rdma",
    "external",
    "falloc",
    "e4defrag",
];

pub struct FioAdapter {
    descriptor: AdapterDescriptor,
}

impl FioAdapter {
    pub fn new() -> Self {
        let int = |name: &str, description: &str| {
            ParamSpec::new(name, description, false).with_kind(ParamKind::Integer)
        };
        let switch = |name: &str, description: &str| {
            ParamSpec::new(name, description, false).with_kind(ParamKind::Boolean)
        };

        let descriptor = AdapterDescriptor::new(ID, "Flexible I/O tester")
            .with_parameter(ParamSpec::new("name", "Job name", true))
            .with_parameter(ParamSpec::new("bs", "Block size (e.g. 4k)", true))
            .with_parameter(
                ParamSpec::new("rw", "I/O pattern", true).with_choices(RW_MODES),
            )
            .with_parameter(ParamSpec::new("size", "Total I/O size (e.g. 512M)", true))
            .with_parameter(
                int("direct", "Use non-buffered I/O").with_choices(["0", "1"]),
            )
            .with_parameter(int("iodepth", "Number of I/O units kept in flight"))
            .with_parameter(
                ParamSpec::new("ioengine", "I/O engine", false).with_choices(IO_ENGINES),
            )
            .with_parameter(int("numjobs", "Number of clones of this job"))
            .with_parameter(int("offset", "Start offset in the file"))
            .with_parameter(
                ParamSpec::new("output_format", "Report format", false)
                    .with_choices(["terse", "json", "json+", "normal"]),
            )
            .with_parameter(switch("sync", "Open files with O_SYNC"))
            .with_parameter(int("ramp_time", "Seconds to run before logging results"))
            .with_parameter(int("runtime", "Limit run time to this many seconds"))
            .with_parameter(
                int("rwmixread", "Percentage of mixed workload that is reads").with_range(0, 100),
            )
            .with_parameter(
                int("rwmixwrite", "Percentage of mixed workload that is writes")
                    .with_range(0, 100),
            )
            .with_parameter(switch("time_based", "Keep running until runtime expires"))
            .with_parameter(switch("group_reporting", "Report per group instead of per job"))
            .with_common_parameters();

        Self { descriptor }
    }
}

impl Default for FioAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkAdapter for FioAdapter {
    fn descriptor(&self) -> &AdapterDescriptor {
        &self.descriptor
    }

    fn build(&self, params: &ParameterSet) -> Result<CommandSpec, AdapterError> {
        let spec = ArgvBuilder::new(ID, PROGRAM, params)
            .eq_required("--name", "name")?
            .eq_required("--bs", "bs")?
            .eq_required("--rw", "rw")?
            .eq_required("--size", "size")?
            .dest_as_eq("--output")
            .eq_optional("--direct", "direct")
            .eq_optional("--iodepth", "iodepth")
            .eq_optional("--ioengine", "ioengine")
            .eq_optional("--numjobs", "numjobs")
            .eq_optional("--offset", "offset")
            .eq_optional("--output_format", "output_format")
            .switch("--sync=1", "sync")
            .eq_optional("--ramp_time", "ramp_time")
            .eq_optional("--runtime", "runtime")
            .eq_optional("--rwmixread", "rwmixread")
            .eq_optional("--rwmixwrite", "rwmixwrite")
            .switch("--time_based", "time_based")
            .switch("--group_reporting", "group_reporting")
            .build();
        Ok(spec)
    }

    fn parse(&self, text: &str) -> Result<ParsedMetrics, ParseFailure> {
        scan(ReportScanner::default(), text)
    }
}

/// Keeps the whole report; fio output needs no scraping.
#[derive(Debug, Default)]
struct ReportScanner {
    report: String,
}

impl LineScanner for ReportScanner {
    fn feed(&mut self, _line_no: usize, line: &str) -> Result<(), ParseFailure> {
        self.report.push_str(line);
        self.report.push('\n');
        Ok(())
    }

    fn finish(self) -> Result<ParsedMetrics, ParseFailure> {
        let mut metrics = ParsedMetrics::new();
        let body = self.report.trim();
        if body.is_empty() {
            return Ok(metrics);
        }
        let document = body
            .starts_with('{')
            .then(|| serde_json::from_str(body).ok())
            .flatten();
        let value = match document {
            Some(doc) => MetricValue::Document(doc),
            None => MetricValue::Text(self.report),
        };
        metrics.insert("report", value);
        Ok(metrics)
    }
}
