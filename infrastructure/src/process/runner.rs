//! Local process runner
//!
//! Executes a [`CommandSpec`] as a single child process with
//! [`std::process::Command`]. Tokens are passed as discrete arguments; no
//! shell is involved. The working directory is set on the child only, so
//! concurrent runs never observe each other's directory.

use benchwrap_application::RunnerConfig;
use benchwrap_application::ports::process_runner::ProcessRunnerPort;
use benchwrap_domain::{
    AdapterError, CommandSpec, ExecutionOutcome, ExitKind, WorkingDir, render_command_line,
};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Highest signal number a wrapper can report as `128 + signal`
const MAX_SIGNAL: i32 = 64;

/// Runs benchmark commands on the local host.
#[derive(Debug, Clone, Default)]
pub struct LocalProcessRunner {
    config: RunnerConfig,
}

impl LocalProcessRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Locate `program`, honouring an explicit location first.
    ///
    /// `location` may be a directory containing the program or a full path
    /// to it. Without one, configured overrides, `PATH` and the fallback
    /// search paths are tried in that order. The returned path is always
    /// absolute, so it stays valid after the child changes directory.
    pub fn resolve_program(
        &self,
        program: &str,
        location: Option<&Path>,
    ) -> Result<PathBuf, AdapterError> {
        let found = self.locate(program, location)?;
        std::path::absolute(&found).map_err(|e| {
            AdapterError::resolution(
                program,
                format!("cannot make {} absolute: {}", found.display(), e),
            )
        })
    }

    fn locate(&self, program: &str, location: Option<&Path>) -> Result<PathBuf, AdapterError> {
        if let Some(location) = location {
            return resolve_at(program, location);
        }

        if let Some(path) = self.config.executable_override(program) {
            debug!(program, path = %path.display(), "Using configured executable");
            if !path.is_file() {
                return Err(AdapterError::resolution(
                    program,
                    format!("configured executable {} does not exist", path.display()),
                ));
            }
            return Ok(path.clone());
        }

        if let Ok(path) = which::which(program) {
            return Ok(path);
        }

        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        for dir in &self.config.search_paths {
            if let Ok(path) = which::which_in(program, Some(dir), &cwd) {
                return Ok(path);
            }
        }

        Err(AdapterError::resolution(
            program,
            format!(
                "not found in PATH or search paths [{}]",
                self.config
                    .search_paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        ))
    }

    /// Build the resolved argument vector: wrapper, program, args.
    fn resolve_argv(&self, spec: &CommandSpec) -> Result<(Vec<String>, PathBuf), AdapterError> {
        let program = self.resolve_program(&spec.program, spec.search_dir.as_deref())?;

        let mut argv = Vec::with_capacity(spec.wrapper.len() + spec.args.len() + 1);
        if let Some((wrapper, wrapper_args)) = spec.wrapper.split_first() {
            let wrapper = self.resolve_program(wrapper, None)?;
            argv.push(wrapper.display().to_string());
            argv.extend(wrapper_args.iter().cloned());
        }
        argv.push(program.display().to_string());
        argv.extend(spec.args.iter().cloned());

        Ok((argv, program))
    }
}

fn resolve_at(program: &str, location: &Path) -> Result<PathBuf, AdapterError> {
    let found = if location.is_dir() {
        let dir = location.to_path_buf();
        which::which_in(program, Some(&dir), &dir)
    } else {
        which::which(location)
    };

    found.map_err(|e| {
        AdapterError::resolution(
            program,
            format!("not usable at {}: {}", location.display(), e),
        )
    })
}

fn working_dir_for(
    spec: &CommandSpec,
    program: &Path,
) -> Result<Option<PathBuf>, AdapterError> {
    let dir = match &spec.working_dir {
        WorkingDir::Inherit => return Ok(None),
        WorkingDir::Explicit(dir) => dir.clone(),
        WorkingDir::ProgramDir => program
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                AdapterError::resolution(
                    program.display().to_string(),
                    "program has no parent directory",
                )
            })?,
    };

    if !dir.is_dir() {
        return Err(AdapterError::resolution(
            dir.display().to_string(),
            "working directory does not exist",
        ));
    }
    Ok(Some(dir))
}

/// Classify a failed exit status.
///
/// A wrapper such as `timeout --preserve-status` reports a child killed by
/// signal N as exit code 128 + N.
fn exit_kind(status: &ExitStatus, wrapped: bool) -> ExitKind {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return ExitKind::Signal(signal);
        }
    }

    match status.code() {
        Some(code) if wrapped && code > 128 && code <= 128 + MAX_SIGNAL => {
            ExitKind::Signal(code - 128)
        }
        Some(code) => ExitKind::Code(code),
        None => ExitKind::NotStarted,
    }
}

fn append_output(path: &Path, stdout: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(stdout.as_bytes())?;
    file.flush()
}

impl ProcessRunnerPort for LocalProcessRunner {
    fn run(&self, spec: &CommandSpec) -> Result<ExecutionOutcome, AdapterError> {
        let (argv, program) = self.resolve_argv(spec)?;
        let working_dir = working_dir_for(spec, &program)?;
        let command_line = render_command_line(&argv);

        debug!(argv = ?argv, working_dir = ?working_dir, "Resolved command");

        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &working_dir {
            cmd.current_dir(dir);
        }

        let start = Instant::now();
        let output = cmd.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                AdapterError::resolution(&argv[0], e.to_string())
            }
            _ => AdapterError::Execution {
                command: command_line.clone(),
                exit: ExitKind::NotStarted,
                stderr: e.to_string(),
            },
        })?;
        let duration_ms = start.elapsed().as_millis() as u64;

        let mut stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let exit = exit_kind(&output.status, !spec.wrapper.is_empty());
            warn!(command = %command_line, %exit, duration_ms, "Benchmark process failed");
            return Err(AdapterError::Execution {
                command: command_line,
                exit,
                stderr: stderr.trim_end_matches(['\r', '\n']).to_string(),
            });
        }

        if let Some(target) = &spec.output {
            let path = match &working_dir {
                Some(dir) if target.path.is_relative() => dir.join(&target.path),
                _ => target.path.clone(),
            };
            if spec.runner_output().is_some() {
                append_output(&path, &stdout).map_err(|e| AdapterError::Execution {
                    command: command_line.clone(),
                    exit: ExitKind::Code(output.status.code().unwrap_or(0)),
                    stderr: format!("cannot write output to {}: {}", path.display(), e),
                })?;
                debug!(path = %path.display(), bytes = stdout.len(), "Appended stdout to output file");
            }
            let trimmed = stdout.trim_end_matches(['\r', '\n']).len();
            stdout.truncate(trimmed);
            stdout.push_str(&format!("; Output located at: {}", path.display()));
        }

        info!(command = %command_line, duration_ms, "Benchmark process finished");

        Ok(ExecutionOutcome {
            argv,
            working_dir,
            exit_code: output.status.code().unwrap_or(0),
            stdout,
            stderr,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use benchwrap_domain::{OutputTarget, OutputWriter};
    use std::os::unix::fs::PermissionsExt;

    fn sh(script: &str) -> CommandSpec {
        let mut spec = CommandSpec::new("sh");
        spec.args = vec!["-c".to_string(), script.to_string()];
        spec
    }

    /// Write an executable shell script named `name` into `dir`.
    fn install_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn canonical(path: &Path) -> String {
        path.canonicalize().unwrap().display().to_string()
    }

    #[test]
    fn test_run_captures_stdout() {
        let outcome = LocalProcessRunner::default().run(&sh("echo hello")).unwrap();
        assert_eq!(outcome.exit_code, 0);
        assert_eq!(outcome.stdout, "hello\n");
        assert!(outcome.argv[0].ends_with("/sh"));
        assert_eq!(outcome.argv[1..], ["-c", "echo hello"]);
    }

    #[test]
    fn test_arguments_are_not_shell_interpreted() {
        let mut spec = CommandSpec::new("printf");
        spec.args = vec!["%s".to_string(), "a; echo injected".to_string()];
        let outcome = LocalProcessRunner::default().run(&spec).unwrap();
        assert_eq!(outcome.stdout, "a; echo injected");
    }

    #[test]
    fn test_non_zero_exit_is_execution_error() {
        let err = LocalProcessRunner::default()
            .run(&sh("echo oops >&2; exit 3"))
            .unwrap_err();
        match err {
            AdapterError::Execution { exit, stderr, .. } => {
                assert_eq!(exit, ExitKind::Code(3));
                assert_eq!(stderr, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_signal_termination_is_distinguishable() {
        let err = LocalProcessRunner::default()
            .run(&sh("kill -TERM $$"))
            .unwrap_err();
        assert!(err.is_signal_termination());
    }

    #[test]
    fn test_wrapper_reported_signal_is_distinguishable() {
        let mut spec = sh("exit 130");
        spec.wrapper = vec!["env".to_string()];
        let err = LocalProcessRunner::default().run(&spec).unwrap_err();
        match err {
            AdapterError::Execution { exit, .. } => assert_eq!(exit, ExitKind::Signal(2)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_program_is_resolution_error() {
        let spec = CommandSpec::new("benchwrap-no-such-tool-9f3a");
        let err = LocalProcessRunner::default().run(&spec).unwrap_err();
        assert!(matches!(err, AdapterError::Resolution { .. }));
    }

    #[test]
    fn test_wrapper_is_resolved_and_prefixed() {
        let mut spec = sh("echo $BENCH_MODE");
        spec.wrapper = vec!["env".to_string(), "BENCH_MODE=torture".to_string()];
        let outcome = LocalProcessRunner::default().run(&spec).unwrap();
        assert_eq!(outcome.stdout, "torture\n");
        assert!(outcome.argv[0].ends_with("/env"));
        assert_eq!(outcome.argv[1], "BENCH_MODE=torture");
    }

    #[test]
    fn test_explicit_working_dir_applies_to_child_only() {
        let dir = tempfile::tempdir().unwrap();
        let before = std::env::current_dir().unwrap();

        let mut spec = sh("pwd -P");
        spec.working_dir = WorkingDir::Explicit(dir.path().to_path_buf());
        let outcome = LocalProcessRunner::default().run(&spec).unwrap();

        assert_eq!(outcome.stdout.trim(), canonical(dir.path()));
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_missing_working_dir_is_resolution_error() {
        let mut spec = sh("true");
        spec.working_dir = WorkingDir::Explicit(PathBuf::from("/nonexistent/benchwrap/dir"));
        let err = LocalProcessRunner::default().run(&spec).unwrap_err();
        assert!(err.to_string().contains("working directory does not exist"));
    }

    #[test]
    fn test_program_dir_and_search_dir() {
        let dir = tempfile::tempdir().unwrap();
        install_script(dir.path(), "Run", "pwd -P");

        let mut spec = CommandSpec::new("Run");
        spec.search_dir = Some(dir.path().to_path_buf());
        spec.working_dir = WorkingDir::ProgramDir;
        let outcome = LocalProcessRunner::default().run(&spec).unwrap();

        assert_eq!(outcome.stdout.trim(), canonical(dir.path()));
    }

    /// Temporary directory under the current directory, plus its relative name.
    fn relative_install_dir() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::Builder::new()
            .prefix("relative-install")
            .tempdir_in(".")
            .unwrap();
        let rel = PathBuf::from(dir.path().file_name().unwrap());
        (dir, rel)
    }

    #[test]
    fn test_program_dir_with_relative_search_dir() {
        let (dir, rel) = relative_install_dir();
        install_script(dir.path(), "Run", "pwd -P");

        let mut spec = CommandSpec::new("Run");
        spec.search_dir = Some(rel);
        spec.working_dir = WorkingDir::ProgramDir;
        let outcome = LocalProcessRunner::default().run(&spec).unwrap();

        assert!(Path::new(&outcome.argv[0]).is_absolute());
        assert_eq!(outcome.stdout.trim(), canonical(dir.path()));
    }

    #[test]
    fn test_relative_chdir_with_relative_search_dir() {
        let (dir, rel) = relative_install_dir();
        install_script(dir.path(), "bit_cmd_line_x64", "cat cmdline.cfg");
        std::fs::write(dir.path().join("cmdline.cfg"), "AUTO_RUN\n").unwrap();

        let mut spec = CommandSpec::new("bit_cmd_line_x64");
        spec.search_dir = Some(rel.clone());
        spec.working_dir = WorkingDir::Explicit(rel);
        let outcome = LocalProcessRunner::default().run(&spec).unwrap();

        assert_eq!(outcome.stdout, "AUTO_RUN\n");
    }

    #[test]
    fn test_resolved_program_is_absolute() {
        let (dir, rel) = relative_install_dir();
        install_script(dir.path(), "multichase", "true");

        let runner = LocalProcessRunner::default();
        let by_dir = runner.resolve_program("multichase", Some(&rel)).unwrap();
        let by_path = runner
            .resolve_program("multichase", Some(&rel.join("multichase")))
            .unwrap();

        assert!(by_dir.is_absolute());
        assert!(by_path.is_absolute());
        assert_eq!(by_dir.canonicalize().unwrap(), by_path.canonicalize().unwrap());
    }

    #[test]
    fn test_search_dir_may_be_full_path() {
        let dir = tempfile::tempdir().unwrap();
        let script = install_script(dir.path(), "scimark2", "echo kernels");

        let mut spec = CommandSpec::new("scimark2");
        spec.search_dir = Some(script);
        let outcome = LocalProcessRunner::default().run(&spec).unwrap();
        assert_eq!(outcome.stdout, "kernels\n");
    }

    #[test]
    fn test_config_override_and_search_paths() {
        let dir = tempfile::tempdir().unwrap();
        let tool = install_script(dir.path(), "benchwrap-test-tool", "echo from-override");
        install_script(dir.path(), "benchwrap-fallback-tool", "echo from-search-path");

        let runner = LocalProcessRunner::new(
            RunnerConfig::default()
                .with_search_paths([dir.path()])
                .with_executable("fio", &tool),
        );

        assert_eq!(runner.resolve_program("fio", None).unwrap(), tool);
        let outcome = runner
            .run(&CommandSpec::new("benchwrap-fallback-tool"))
            .unwrap();
        assert_eq!(outcome.stdout, "from-search-path\n");
    }

    #[test]
    fn test_runner_output_is_appended_and_annotated() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out").join("stress.log");

        let mut spec = sh("echo line");
        spec.output = Some(OutputTarget {
            path: dest.clone(),
            writer: OutputWriter::Runner,
        });

        let runner = LocalProcessRunner::default();
        let outcome = runner.run(&spec).unwrap();
        runner.run(&spec).unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "line\nline\n");
        assert_eq!(
            outcome.stdout,
            format!("line; Output located at: {}", dest.display())
        );
    }

    #[test]
    fn test_runner_output_not_written_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("failed.log");

        let mut spec = sh("echo partial; exit 1");
        spec.output = Some(OutputTarget {
            path: dest.clone(),
            writer: OutputWriter::Runner,
        });

        assert!(LocalProcessRunner::default().run(&spec).is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn test_unwritable_runner_output_is_execution_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file.txt");
        std::fs::write(&blocker, "").unwrap();

        let mut spec = sh("echo line");
        spec.output = Some(OutputTarget {
            path: blocker.join("out.log"),
            writer: OutputWriter::Runner,
        });

        match LocalProcessRunner::default().run(&spec).unwrap_err() {
            AdapterError::Execution { exit, stderr, .. } => {
                assert_eq!(exit, ExitKind::Code(0));
                assert!(stderr.starts_with("cannot write output to"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_tool_written_output_is_only_annotated() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("fio.json");

        let mut spec = sh("echo done");
        spec.output = Some(OutputTarget {
            path: dest.clone(),
            writer: OutputWriter::Tool,
        });

        let outcome = LocalProcessRunner::default().run(&spec).unwrap();
        assert!(!dest.exists());
        assert!(outcome.stdout.ends_with(&dest.display().to_string()));
    }

    #[test]
    fn test_concurrent_runs_keep_their_own_directory() {
        let dirs: Vec<_> = (0..4).map(|_| tempfile::tempdir().unwrap()).collect();
        let runner = LocalProcessRunner::default();

        std::thread::scope(|scope| {
            let handles: Vec<_> = dirs
                .iter()
                .map(|dir| {
                    let runner = &runner;
                    scope.spawn(move || {
                        let mut spec = sh("sleep 0.1; pwd -P");
                        spec.working_dir = WorkingDir::Explicit(dir.path().to_path_buf());
                        runner.run(&spec).unwrap().stdout.trim().to_string()
                    })
                })
                .collect();

            for (dir, handle) in dirs.iter().zip(handles) {
                assert_eq!(handle.join().unwrap(), canonical(dir.path()));
            }
        });
    }
}
