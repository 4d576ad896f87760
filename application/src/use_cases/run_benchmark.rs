//! Run benchmark use case
//!
//! Validates the caller's parameters, builds the adapter's command, runs it
//! through the [`ProcessRunnerPort`] and wraps the outcome in a
//! [`ResultEnvelope::Run`]. The steps happen strictly in that order; nothing
//! is spawned unless validation and command construction succeed.
//!
//! ```ignore
//! let use_case = RunBenchmarkUseCase::new(registry, runner);
//! let input = RunBenchmarkInput::from_pairs("stress", [("cpu", "4"), ("timeout", "30")]);
//! let envelope = use_case.execute(input)?;
//! ```

use std::sync::Arc;

use benchwrap_domain::{
    AdapterError, AdapterRegistry, BenchmarkAdapter, CommandSpec, ParameterSet, ResultEnvelope,
    build_command,
};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::ports::process_runner::ProcessRunnerPort;
use crate::ports::progress::{NoRunProgress, RunProgressNotifier};
use crate::ports::result_journal::{JournalEntry, NoResultJournal, ResultJournal};

/// Parameters as supplied by the caller
#[derive(Debug, Clone)]
pub enum BenchmarkParams {
    /// Already-typed values
    Typed(ParameterSet),
    /// Raw `key=value` strings, coerced using the adapter's schema
    Raw(Vec<(String, String)>),
}

/// Input for the RunBenchmark use case.
#[derive(Debug, Clone)]
pub struct RunBenchmarkInput {
    /// Adapter id or alias
    pub adapter: String,
    pub params: BenchmarkParams,
}

impl RunBenchmarkInput {
    pub fn new(adapter: impl Into<String>, params: ParameterSet) -> Self {
        Self {
            adapter: adapter.into(),
            params: BenchmarkParams::Typed(params),
        }
    }

    pub fn from_pairs<I, K, V>(adapter: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            adapter: adapter.into(),
            params: BenchmarkParams::Raw(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

/// A validated, built command that has not been executed.
#[derive(Debug, Clone)]
pub struct PlannedRun {
    /// Canonical adapter id
    pub adapter: String,
    pub spec: CommandSpec,
}

/// Use case for running one benchmark.
pub struct RunBenchmarkUseCase {
    registry: Arc<AdapterRegistry>,
    runner: Arc<dyn ProcessRunnerPort>,
    journal: Arc<dyn ResultJournal>,
}

impl RunBenchmarkUseCase {
    pub fn new(registry: Arc<AdapterRegistry>, runner: Arc<dyn ProcessRunnerPort>) -> Self {
        Self {
            registry,
            runner,
            journal: Arc::new(NoResultJournal),
        }
    }

    pub fn with_journal(mut self, journal: Arc<dyn ResultJournal>) -> Self {
        self.journal = journal;
        self
    }

    /// Validate and build the command without running it.
    pub fn plan(&self, input: &RunBenchmarkInput) -> Result<PlannedRun, AdapterError> {
        let adapter = self.registry.lookup(&input.adapter)?;
        let params = resolve_params(adapter, &input.params)?;
        let spec = build_command(adapter, &params)?;
        debug!(adapter = adapter.id(), tokens = ?spec.tokens(), "Built command");

        Ok(PlannedRun {
            adapter: adapter.id().to_string(),
            spec,
        })
    }

    /// Run the benchmark without progress reporting.
    pub fn execute(&self, input: RunBenchmarkInput) -> Result<ResultEnvelope, AdapterError> {
        self.execute_with_progress(input, &NoRunProgress)
    }

    /// Run the benchmark with progress notifications.
    ///
    /// # Errors
    ///
    /// - [`AdapterError::UnknownAdapter`] - no adapter registered under that name
    /// - [`AdapterError::Validation`] - parameters rejected by the schema
    /// - [`AdapterError::Resolution`] - the program could not be found
    /// - [`AdapterError::Execution`] - non-zero exit or signal termination
    pub fn execute_with_progress(
        &self,
        input: RunBenchmarkInput,
        progress: &dyn RunProgressNotifier,
    ) -> Result<ResultEnvelope, AdapterError> {
        let result = self.run(&input, progress);
        match &result {
            Ok(envelope) => self.journal.record(JournalEntry::new(
                "run_result",
                json!({ "envelope": envelope }),
            )),
            Err(e) => {
                warn!(adapter = %input.adapter, "Benchmark run failed: {}", e);
                self.journal.record(JournalEntry::new(
                    "invocation_failed",
                    json!({
                        "mode": "run",
                        "adapter": input.adapter,
                        "category": e.category().as_str(),
                        "error": e.to_string(),
                    }),
                ));
            }
        }
        result
    }

    fn run(
        &self,
        input: &RunBenchmarkInput,
        progress: &dyn RunProgressNotifier,
    ) -> Result<ResultEnvelope, AdapterError> {
        let planned = self.plan(input)?;
        progress.on_command_built(&planned.adapter, &planned.spec);

        let command_line = planned.spec.command_line();
        info!(adapter = %planned.adapter, command = %command_line, "Running benchmark");
        progress.on_run_start(&planned.adapter, &command_line);

        let outcome = self.runner.run(&planned.spec);
        progress.on_run_complete(&planned.adapter, outcome.is_ok());
        let outcome = outcome?;

        info!(
            adapter = %planned.adapter,
            rc = outcome.exit_code,
            stdout_bytes = outcome.stdout.len(),
            "Benchmark finished"
        );
        Ok(ResultEnvelope::from_outcome(planned.adapter, outcome))
    }
}

fn resolve_params(
    adapter: &dyn BenchmarkAdapter,
    params: &BenchmarkParams,
) -> Result<ParameterSet, AdapterError> {
    match params {
        BenchmarkParams::Typed(set) => Ok(set.clone()),
        BenchmarkParams::Raw(pairs) => ParameterSet::from_raw(
            adapter.descriptor(),
            pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchwrap_domain::{ExecutionOutcome, ExitKind, builtin_registry};
    use std::sync::Mutex;

    /// Runner that records what it was asked to run and replies with a canned outcome.
    struct FakeRunner {
        calls: Mutex<Vec<CommandSpec>>,
        reply: Result<ExecutionOutcome, AdapterError>,
    }

    impl FakeRunner {
        fn ok(stdout: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply: Ok(ExecutionOutcome {
                    argv: Vec::new(),
                    working_dir: None,
                    exit_code: 0,
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                }),
            }
        }

        fn failing(error: AdapterError) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply: Err(error),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl ProcessRunnerPort for FakeRunner {
        fn run(&self, spec: &CommandSpec) -> Result<ExecutionOutcome, AdapterError> {
            self.calls.lock().unwrap().push(spec.clone());
            self.reply.clone().map(|mut outcome| {
                outcome.argv = spec.tokens();
                outcome
            })
        }
    }

    #[derive(Default)]
    struct MemoryJournal {
        entries: Mutex<Vec<(&'static str, serde_json::Value)>>,
    }

    impl ResultJournal for MemoryJournal {
        fn record(&self, entry: JournalEntry) {
            self.entries
                .lock()
                .unwrap()
                .push((entry.entry_type, entry.payload));
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl RunProgressNotifier for RecordingProgress {
        fn on_run_start(&self, adapter: &str, _command_line: &str) {
            self.events.lock().unwrap().push(format!("start:{}", adapter));
        }

        fn on_run_complete(&self, adapter: &str, success: bool) {
            self.events
                .lock()
                .unwrap()
                .push(format!("complete:{}:{}", adapter, success));
        }
    }

    fn use_case(runner: Arc<FakeRunner>) -> RunBenchmarkUseCase {
        RunBenchmarkUseCase::new(Arc::new(builtin_registry()), runner)
    }

    #[test]
    fn test_run_wraps_outcome() {
        let runner = Arc::new(FakeRunner::ok("stress: info: [1] dispatching hogs\n"));
        let input = RunBenchmarkInput::from_pairs("stress", [("cpu", "2"), ("timeout", "5")]);

        let envelope = use_case(runner.clone()).execute(input).unwrap();

        let ResultEnvelope::Run(run) = envelope else {
            panic!("expected run envelope");
        };
        assert_eq!(run.adapter, "stress");
        assert!(run.changed);
        assert_eq!(run.exec_cmd, "stress --cpu 2 --timeout 5");
        assert_eq!(run.stdout, "stress: info: [1] dispatching hogs");
        assert_eq!(runner.call_count(), 1);
    }

    #[test]
    fn test_alias_resolves_to_canonical_id() {
        let runner = Arc::new(FakeRunner::ok(""));
        let input = RunBenchmarkInput::from_pairs("iperf3", [("server", "10.0.0.9")]);
        let planned = use_case(runner).plan(&input).unwrap();
        assert_eq!(planned.adapter, "iperf");
        assert_eq!(planned.spec.args, vec!["-c", "10.0.0.9", "-t", "10"]);
    }

    #[test]
    fn test_validation_failure_spawns_nothing() {
        let runner = Arc::new(FakeRunner::ok(""));
        let input = RunBenchmarkInput::from_pairs("fio", [("name", "job")]);

        let err = use_case(runner.clone()).execute(input).unwrap_err();

        assert!(matches!(err, AdapterError::Validation { .. }));
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_raw_values_are_coerced() {
        let runner = Arc::new(FakeRunner::ok(""));
        let bad = RunBenchmarkInput::from_pairs("stress", [("cpu", "four"), ("timeout", "5")]);
        let err = use_case(runner.clone()).execute(bad).unwrap_err();
        assert!(err.to_string().contains("expected an integer"));
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_unknown_adapter() {
        let runner = Arc::new(FakeRunner::ok(""));
        let err = use_case(runner)
            .execute(RunBenchmarkInput::new("bonnie", ParameterSet::new()))
            .unwrap_err();
        assert_eq!(err, AdapterError::UnknownAdapter("bonnie".to_string()));
    }

    #[test]
    fn test_execution_error_is_journaled_and_reported() {
        let runner = Arc::new(FakeRunner::failing(AdapterError::Execution {
            command: "timeout --preserve-status -s SIGINT 5s mprime -t".to_string(),
            exit: ExitKind::Signal(2),
            stderr: String::new(),
        }));
        let journal = Arc::new(MemoryJournal::default());
        let progress = RecordingProgress::default();
        let use_case = use_case(runner).with_journal(journal.clone());

        let input = RunBenchmarkInput::new("mprime", ParameterSet::new().with("timeout", 5));
        let err = use_case.execute_with_progress(input, &progress).unwrap_err();

        assert!(err.is_signal_termination());
        let entries = journal.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "invocation_failed");
        assert_eq!(entries[0].1["category"], "execution");
        assert_eq!(
            *progress.events.lock().unwrap(),
            vec!["start:mprime", "complete:mprime:false"]
        );
    }

    #[test]
    fn test_success_is_journaled() {
        let runner = Arc::new(FakeRunner::ok("done"));
        let journal = Arc::new(MemoryJournal::default());
        let use_case = use_case(runner).with_journal(journal.clone());

        use_case
            .execute(RunBenchmarkInput::new(
                "unixbench",
                ParameterSet::new().with("count", 1),
            ))
            .unwrap();

        let entries = journal.entries.lock().unwrap();
        assert_eq!(entries[0].0, "run_result");
        assert_eq!(entries[0].1["envelope"]["mode"], "run");
        assert_eq!(entries[0].1["envelope"]["adapter"], "unixbench");
    }
}
