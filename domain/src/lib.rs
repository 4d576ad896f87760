//! Domain layer for benchwrap
//!
//! This crate contains the benchmark adapters and the types they exchange.
//! It performs no I/O: building a command and parsing captured output are
//! pure functions of their inputs.
//!
//! # Core Concepts
//!
//! ## Adapter
//!
//! A [`BenchmarkAdapter`] wraps one third-party tool (fio, iperf3, mprime, ...)
//! and owns three things:
//!
//! - **Schema**: an [`AdapterDescriptor`] listing parameters, defaults and allowed values
//! - **Command construction**: [`ParameterSet`] → [`CommandSpec`] (argv tokens plus hints)
//! - **Output parsing**: captured text → [`ParsedMetrics`] via a [`LineScanner`]
//!
//! ## Modes
//!
//! - **Run**: build the command, hand it to a process runner, wrap the outcome
//!   in a [`ResultEnvelope::Run`]
//! - **Parse**: read a previously captured file and wrap the metrics in a
//!   [`ResultEnvelope::Parse`]

pub mod adapter;
pub mod benchmarks;
pub mod core;

// Re-export commonly used types
pub use adapter::{
    command::{ArgvBuilder, CommandSpec, OutputTarget, OutputWriter, WorkingDir, render_command_line},
    entities::{AdapterDescriptor, CHDIR, DEST, EXECUTABLE, ParamDomain, ParamKind, ParamSpec},
    params::{ParamValue, ParameterSet},
    registry::AdapterRegistry,
    scanner::{LineScanner, scan},
    traits::{BenchmarkAdapter, build_command},
    validation::{DefaultParameterValidator, ParameterValidator},
    value_objects::{ExecutionOutcome, MetricValue, ParseResult, ParsedMetrics, ResultEnvelope, RunResult},
};
pub use benchmarks::builtin_registry;
pub use core::error::{AdapterError, ErrorCategory, ExitKind, ParseFailure};
