//! Command specification and argument-vector construction
//!
//! A [`CommandSpec`] is an ordered list of argument tokens plus structured
//! execution hints (working directory, output target, wrapper). It is never
//! rendered into a shell string for execution; [`CommandSpec::command_line`]
//! exists for display and audit only.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::entities::{CHDIR, DEST, EXECUTABLE};
use super::params::ParameterSet;
use crate::core::error::AdapterError;

/// Where the child process runs
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum WorkingDir {
    /// Inherit the caller's working directory
    #[default]
    Inherit,
    /// Run in an explicit directory
    Explicit(PathBuf),
    /// Run in the directory that contains the resolved program
    ProgramDir,
}

/// Who persists output to the destination path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputWriter {
    /// The process runner appends captured stdout to the file
    Runner,
    /// The tool writes the file itself (the path is passed as a flag)
    Tool,
}

/// Destination for benchmark output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTarget {
    pub path: PathBuf,
    pub writer: OutputWriter,
}

/// Executable command for one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Program name or path, resolved by the process runner
    pub program: String,
    /// Arguments passed after the program
    pub args: Vec<String>,
    /// Directory (or full path) to resolve the program from, if supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_dir: Option<PathBuf>,
    /// Wrapper command placed before the program (e.g. `timeout ... <program>`)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub wrapper: Vec<String>,
    #[serde(default)]
    pub working_dir: WorkingDir,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputTarget>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            search_dir: None,
            wrapper: Vec::new(),
            working_dir: WorkingDir::Inherit,
            output: None,
        }
    }

    /// Full token sequence as it will be executed: wrapper, program, args.
    pub fn tokens(&self) -> Vec<String> {
        self.wrapper
            .iter()
            .cloned()
            .chain(std::iter::once(self.program.clone()))
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Human-readable rendering of the token sequence.
    pub fn command_line(&self) -> String {
        render_command_line(&self.tokens())
    }

    /// Output path the runner is responsible for writing, if any.
    pub fn runner_output(&self) -> Option<&PathBuf> {
        self.output
            .as_ref()
            .filter(|t| t.writer == OutputWriter::Runner)
            .map(|t| &t.path)
    }
}

/// Join tokens with spaces, single-quoting any token that would be
/// ambiguous when read back.
pub fn render_command_line(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|token| {
            if !token.is_empty()
                && token
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "-_=./:,+@%".contains(c))
            {
                token.clone()
            } else {
                format!("'{}'", token.replace('\'', r"'\''"))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Incremental builder used by every adapter's command construction.
///
/// Required values go through the `*_required` methods, optional values are
/// only emitted when present and truthy, and switches are emitted bare.
pub struct ArgvBuilder<'a> {
    adapter: &'a str,
    params: &'a ParameterSet,
    spec: CommandSpec,
}

impl<'a> ArgvBuilder<'a> {
    /// Start a command for `program`, picking up the common `executable`
    /// and `chdir` parameters.
    pub fn new(adapter: &'a str, program: impl Into<String>, params: &'a ParameterSet) -> Self {
        let mut spec = CommandSpec::new(program);
        spec.search_dir = params.get_truthy(EXECUTABLE).map(|v| PathBuf::from(v.to_string()));
        if let Some(dir) = params.get_truthy(CHDIR) {
            spec.working_dir = WorkingDir::Explicit(PathBuf::from(dir.to_string()));
        }
        Self {
            adapter,
            params,
            spec,
        }
    }

    /// Rendered value of a required parameter
    pub fn require(&self, name: &str) -> Result<String, AdapterError> {
        self.params
            .require(name)
            .map_err(|message| AdapterError::validation(self.adapter, name, message))
    }

    pub fn arg(mut self, token: impl Into<String>) -> Self {
        self.spec.args.push(token.into());
        self
    }

    /// `--flag=value` for a required parameter
    pub fn eq_required(mut self, flag: &str, name: &str) -> Result<Self, AdapterError> {
        let value = self.require(name)?;
        self.spec.args.push(format!("{}={}", flag, value));
        Ok(self)
    }

    /// `-f value` for a required parameter
    pub fn sep_required(mut self, flag: &str, name: &str) -> Result<Self, AdapterError> {
        let value = self.require(name)?;
        self.spec.args.push(flag.to_string());
        self.spec.args.push(value);
        Ok(self)
    }

    /// `--flag=value` only when the parameter is present and truthy
    pub fn eq_optional(mut self, flag: &str, name: &str) -> Self {
        if let Some(value) = self.params.get_truthy(name) {
            self.spec.args.push(format!("{}={}", flag, value));
        }
        self
    }

    /// `-f value` only when the parameter is present and truthy
    pub fn sep_optional(mut self, flag: &str, name: &str) -> Self {
        if let Some(value) = self.params.get_truthy(name) {
            self.spec.args.push(flag.to_string());
            self.spec.args.push(value.to_string());
        }
        self
    }

    /// Bare `--flag` when the boolean parameter is true
    pub fn switch(self, flag: &str, name: &str) -> Self {
        let on = self.params.flag(name);
        self.switch_if(flag, on)
    }

    pub fn switch_if(mut self, flag: &str, on: bool) -> Self {
        if on {
            self.spec.args.push(flag.to_string());
        }
        self
    }

    /// Place a wrapper command in front of the program
    pub fn wrapped_by<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.wrapper = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Run from the program's directory unless `chdir` was given explicitly
    pub fn in_program_dir(mut self) -> Self {
        if self.spec.working_dir == WorkingDir::Inherit {
            self.spec.working_dir = WorkingDir::ProgramDir;
        }
        self
    }

    /// Let the process runner persist stdout to `dest`
    pub fn redirect_dest(mut self) -> Self {
        if let Some(dest) = self.params.get_truthy(DEST) {
            self.spec.output = Some(OutputTarget {
                path: PathBuf::from(dest.to_string()),
                writer: OutputWriter::Runner,
            });
        }
        self
    }

    /// Pass `dest` to the tool as `--flag=path`; the tool writes it
    pub fn dest_as_eq(self, flag: &str) -> Self {
        self.dest_as_flag(flag, true)
    }

    /// Pass `dest` to the tool as `--flag path`; the tool writes it
    pub fn dest_as_sep(self, flag: &str) -> Self {
        self.dest_as_flag(flag, false)
    }

    fn dest_as_flag(mut self, flag: &str, joined: bool) -> Self {
        if let Some(dest) = self.params.get_truthy(DEST) {
            let path = dest.to_string();
            if joined {
                self.spec.args.push(format!("{}={}", flag, path));
            } else {
                self.spec.args.push(flag.to_string());
                self.spec.args.push(path.clone());
            }
            self.spec.output = Some(OutputTarget {
                path: PathBuf::from(path),
                writer: OutputWriter::Tool,
            });
        }
        self
    }

    pub fn build(self) -> CommandSpec {
        self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_values_elided_when_falsy() {
        let params = ParameterSet::new()
            .with("depth", 0)
            .with("engine", "")
            .with("jobs", 4);
        let spec = ArgvBuilder::new("demo", "tool", &params)
            .eq_optional("--iodepth", "depth")
            .eq_optional("--ioengine", "engine")
            .eq_optional("--numjobs", "jobs")
            .sep_optional("--port", "missing")
            .build();
        assert_eq!(spec.args, vec!["--numjobs=4"]);
    }

    #[test]
    fn test_switch_is_bare_or_absent() {
        let on = ParameterSet::new().with("verbose", true);
        let off = ParameterSet::new().with("verbose", false);

        let spec_on = ArgvBuilder::new("demo", "tool", &on).switch("--verbose", "verbose").build();
        let spec_off = ArgvBuilder::new("demo", "tool", &off).switch("--verbose", "verbose").build();

        assert_eq!(spec_on.args, vec!["--verbose"]);
        assert!(spec_off.args.is_empty());
    }

    #[test]
    fn test_required_missing_is_validation_error() {
        let params = ParameterSet::new();
        let err = ArgvBuilder::new("demo", "tool", &params)
            .sep_required("-c", "count")
            .err()
            .unwrap();
        assert!(matches!(err, AdapterError::Validation { .. }));
    }

    #[test]
    fn test_common_parameters_picked_up() {
        let params = ParameterSet::new()
            .with(EXECUTABLE, "/opt/bench")
            .with(CHDIR, "/tmp/work")
            .with(DEST, "/tmp/out.log");
        let spec = ArgvBuilder::new("demo", "tool", &params)
            .in_program_dir()
            .redirect_dest()
            .build();

        assert_eq!(spec.search_dir, Some(PathBuf::from("/opt/bench")));
        assert_eq!(spec.working_dir, WorkingDir::Explicit(PathBuf::from("/tmp/work")));
        assert_eq!(spec.runner_output(), Some(&PathBuf::from("/tmp/out.log")));
    }

    #[test]
    fn test_dest_as_flag_marks_tool_writer() {
        let params = ParameterSet::new().with(DEST, "/tmp/iperf.log");
        let spec = ArgvBuilder::new("demo", "tool", &params)
            .dest_as_sep("--logfile")
            .build();

        assert_eq!(spec.args, vec!["--logfile", "/tmp/iperf.log"]);
        assert!(spec.runner_output().is_none());
        assert_eq!(spec.output.unwrap().writer, OutputWriter::Tool);
    }

    #[test]
    fn test_tokens_include_wrapper() {
        let params = ParameterSet::new();
        let spec = ArgvBuilder::new("demo", "mprime", &params)
            .wrapped_by(["timeout", "60s"])
            .arg("-t")
            .build();
        assert_eq!(spec.tokens(), vec!["timeout", "60s", "mprime", "-t"]);
    }

    #[test]
    fn test_command_line_quotes_ambiguous_tokens() {
        let tokens = vec![
            "fio".to_string(),
            "--name=my job".to_string(),
            "it's".to_string(),
        ];
        assert_eq!(
            render_command_line(&tokens),
            r"fio '--name=my job' 'it'\''s'"
        );
    }
}
