//! iperf3: network throughput
//!
//! Client mode connects to a server for `timeout` seconds; server mode
//! starts a daemonised listener and returns immediately.

use crate::adapter::command::{ArgvBuilder, CommandSpec};
use crate::adapter::entities::{AdapterDescriptor, ParamKind, ParamSpec};
use crate::adapter::params::ParameterSet;
use crate::adapter::scanner::scan;
use crate::adapter::traits::BenchmarkAdapter;
use crate::adapter::value_objects::ParsedMetrics;
use crate::core::error::{AdapterError, ParseFailure};

use super::hogs::HogReportScanner;

pub const ID: &str = "iperf";
const PROGRAM: &str = "iperf3";

const MODE: &str = "mode";
const SERVER: &str = "server";
const TIMEOUT: &str = "timeout";
const OUTPUT_FORMAT: &str = "output_format";

pub struct IperfAdapter {
    descriptor: AdapterDescriptor,
}

impl IperfAdapter {
    pub fn new() -> Self {
        let descriptor = AdapterDescriptor::new(ID, "Network throughput (iperf3)")
            .with_parameter(
                ParamSpec::new(MODE, "Run as client or as a daemonised server", false)
                    .with_choices(["client", "server"])
                    .with_default("client"),
            )
            .with_parameter(
                ParamSpec::new(SERVER, "Server host to connect to", false)
                    .required_when(MODE, "client"),
            )
            .with_parameter(
                ParamSpec::new(TIMEOUT, "Seconds to transmit for", false)
                    .with_kind(ParamKind::Integer)
                    .with_range(1, 86_400)
                    .with_default(10),
            )
            .with_parameter(
                ParamSpec::new("udp", "Use UDP rather than TCP", false)
                    .with_kind(ParamKind::Boolean),
            )
            .with_parameter(
                ParamSpec::new(OUTPUT_FORMAT, "Client report format", false)
                    .with_choices(["standard", "json"]),
            )
            .with_parameter(
                ParamSpec::new("parallel_threads", "Number of parallel client streams", false)
                    .with_kind(ParamKind::Integer),
            )
            .with_parameter(ParamSpec::new(
                "tcp_window_size",
                "Socket buffer size (e.g. 256K)",
                false,
            ))
            .with_parameter(
                ParamSpec::new("interval", "Seconds between periodic reports", false)
                    .with_kind(ParamKind::Integer),
            )
            .with_parameter(
                ParamSpec::new("port", "Server port", false)
                    .with_kind(ParamKind::Integer)
                    .with_range(1, 65_535),
            )
            .with_parameter(ParamSpec::new("bind", "Local interface address to bind", false))
            .with_parameter(
                ParamSpec::new("verbose", "More detailed output", false)
                    .with_kind(ParamKind::Boolean),
            )
            .with_common_parameters();

        Self { descriptor }
    }
}

impl Default for IperfAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkAdapter for IperfAdapter {
    fn descriptor(&self) -> &AdapterDescriptor {
        &self.descriptor
    }

    fn build(&self, params: &ParameterSet) -> Result<CommandSpec, AdapterError> {
        let builder = ArgvBuilder::new(ID, PROGRAM, params);
        let builder = if params.get_str(MODE) == Some("server") {
            builder.arg("-s").arg("-D")
        } else {
            builder
                .sep_required("-c", SERVER)?
                .sep_required("-t", TIMEOUT)?
                .switch("--udp", "udp")
                .switch_if("--json", params.get_str(OUTPUT_FORMAT) == Some("json"))
                .dest_as_sep("--logfile")
                .sep_optional("--parallel", "parallel_threads")
                .sep_optional("--window", "tcp_window_size")
        };

        Ok(builder
            .sep_optional("--interval", "interval")
            .sep_optional("--port", "port")
            .sep_optional("--bind", "bind")
            .switch("--verbose", "verbose")
            .build())
    }

    fn parse(&self, text: &str) -> Result<ParsedMetrics, ParseFailure> {
        scan(HogReportScanner::new(), text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::traits::build_command;

    #[test]
    fn test_client_defaults() {
        let params = ParameterSet::new().with(SERVER, "10.0.0.5");
        let spec = build_command(&IperfAdapter::new(), &params).unwrap();
        assert_eq!(spec.program, "iperf3");
        assert_eq!(spec.args, vec!["-c", "10.0.0.5", "-t", "10"]);
    }

    #[test]
    fn test_client_full() {
        let params = ParameterSet::new()
            .with(SERVER, "bench-02")
            .with(TIMEOUT, 30)
            .with("udp", true)
            .with(OUTPUT_FORMAT, "json")
            .with("dest", "/tmp/iperf.log")
            .with("parallel_threads", 4)
            .with("port", 5202)
            .with("verbose", true);
        let spec = build_command(&IperfAdapter::new(), &params).unwrap();
        assert_eq!(
            spec.args,
            vec![
                "-c",
                "bench-02",
                "-t",
                "30",
                "--udp",
                "--json",
                "--logfile",
                "/tmp/iperf.log",
                "--parallel",
                "4",
                "--port",
                "5202",
                "--verbose",
            ]
        );
    }

    #[test]
    fn test_standard_format_omits_json() {
        let params = ParameterSet::new()
            .with(SERVER, "bench-02")
            .with(OUTPUT_FORMAT, "standard");
        let spec = build_command(&IperfAdapter::new(), &params).unwrap();
        assert!(!spec.args.contains(&"--json".to_string()));
    }

    #[test]
    fn test_server_mode_ignores_client_flags() {
        let params = ParameterSet::new()
            .with(MODE, "server")
            .with("udp", true)
            .with("bind", "0.0.0.0");
        let spec = build_command(&IperfAdapter::new(), &params).unwrap();
        assert_eq!(spec.args, vec!["-s", "-D", "--bind", "0.0.0.0"]);
    }

    #[test]
    fn test_client_requires_server() {
        let err = build_command(&IperfAdapter::new(), &ParameterSet::new()).unwrap_err();
        match err {
            AdapterError::Validation { parameter, .. } => assert_eq!(parameter, SERVER),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_hogs_and_completion() {
        let text = "load: 2 cpu, 1 io, 0 vm, 3 hdd hogs dispatched\n\
                    run successful, completed in 42 seconds\n";
        let metrics = IperfAdapter::new().parse(text).unwrap();
        assert_eq!(
            metrics,
            ParsedMetrics::new()
                .with("cpu_hogs", "2")
                .with("io_hogs", "1")
                .with("vm_hogs", "0")
                .with("hdd_hogs", "3")
                .with("completion_time", "42")
        );
    }

    #[test]
    fn test_parse_without_markers_fails() {
        assert!(IperfAdapter::new().parse("Connecting to host 10.0.0.5\n").is_err());
    }
}
