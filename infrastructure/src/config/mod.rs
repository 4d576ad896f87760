//! Configuration file loading for benchwrap
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `BENCHWRAP_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./benchwrap.toml` or `./.benchwrap.toml`
//! 4. Global: `$XDG_CONFIG_HOME/benchwrap/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileConfig, FileJournalConfig, FileLoggingConfig, FileOutputConfig,
    FileOutputFormat, FileRunnerConfig, Severity,
};
pub use loader::ConfigLoader;
