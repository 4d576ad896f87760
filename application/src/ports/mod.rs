//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod process_runner;
pub mod progress;
pub mod result_journal;
pub mod result_reader;
