//! Process execution for run mode.

mod runner;

pub use runner::LocalProcessRunner;
