//! Application-level configuration.
//!
//! - [`RunnerConfig`]: where the process runner looks for benchmark programs

pub mod runner_config;

pub use runner_config::RunnerConfig;
