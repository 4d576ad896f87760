//! Progress reporting while a benchmark runs.

pub mod reporter;
