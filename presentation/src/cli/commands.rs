//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored when the terminal allows it
    Text,
    /// The result envelope as pretty-printed JSON
    Json,
}

/// CLI arguments for benchwrap
#[derive(Parser, Debug)]
#[command(name = "benchwrap")]
#[command(author, version, about = "Uniform runner and result parser for micro-benchmark tools")]
#[command(long_about = r#"
benchwrap wraps fio, iperf3, mprime, multichase, PassMark BurnInTest,
SciMark2, UnixBench and stress behind one contract:

  run    build a command from validated parameters and execute it
  parse  extract metrics from a previously captured output file

Configuration files are loaded from (in priority order):
1. BENCHWRAP_* environment variables
2. --config <path>          Explicit config file
3. ./benchwrap.toml         Project-level config
4. ~/.config/benchwrap/config.toml   Global config

Example:
  benchwrap run fio -p name=seq -p bs=4k -p rw=read -p size=1G -p dest=/tmp/fio.log
  benchwrap run unixbench -p count=4 -p executable=/opt/byte-unixbench/UnixBench
  benchwrap parse mprime /var/log/mprime.log
  benchwrap describe iperf
"#)]
pub struct Cli {
    /// Absent only with `--show-config`
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long, global = true)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build and execute a benchmark command
    Run(RunArgs),
    /// Parse a captured output file into metrics
    Parse(ParseArgs),
    /// List registered adapters and their aliases
    List,
    /// Show the parameters an adapter accepts
    Describe {
        /// Adapter id or alias
        adapter: String,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Adapter id or alias (e.g. fio, iperf3, ubench)
    pub adapter: String,

    /// Parameter as name=value (repeatable)
    #[arg(short, long = "param", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Validate and print the command without executing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Adapter id or alias
    pub adapter: String,

    /// Captured output file
    pub source: PathBuf,
}

/// Split `name=value` at the first `=`; the value may itself contain `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}
