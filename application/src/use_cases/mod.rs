//! Use cases (application services)
//!
//! - [`run_benchmark`]: build the command, execute it and wrap the outcome
//! - [`parse_results`]: extract metrics from a captured file

pub mod parse_results;
pub mod run_benchmark;
