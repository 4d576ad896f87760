//! Core domain concepts shared across all adapters.
//!
//! - [`error::AdapterError`]: the error taxonomy for build/run/parse
//! - [`error::ParseFailure`]: scanner-level failure before a source is attached

pub mod error;
