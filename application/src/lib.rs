//! Application layer for benchwrap
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::RunnerConfig;
pub use ports::{
    process_runner::ProcessRunnerPort,
    progress::{NoRunProgress, RunProgressNotifier},
    result_journal::{JournalEntry, NoResultJournal, ResultJournal},
    result_reader::ResultReaderPort,
};
pub use use_cases::parse_results::{ParseResultsInput, ParseResultsUseCase};
pub use use_cases::run_benchmark::{
    BenchmarkParams, PlannedRun, RunBenchmarkInput, RunBenchmarkUseCase,
};
