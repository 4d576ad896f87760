//! Infrastructure layer for benchwrap
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod process;
pub mod results;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, FileConfig, FileJournalConfig, FileLoggingConfig,
    FileOutputConfig, FileOutputFormat, FileRunnerConfig, Severity,
};
pub use logging::JsonlResultJournal;
pub use process::LocalProcessRunner;
pub use results::FsResultReader;
