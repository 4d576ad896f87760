//! Runner configuration from TOML (`[runner]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw runner configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRunnerConfig {
    /// Directories searched after `PATH` when locating a program
    pub search_paths: Vec<PathBuf>,
}

impl Default for FileRunnerConfig {
    fn default() -> Self {
        Self {
            search_paths: vec![PathBuf::from("/usr/local/bin")],
        }
    }
}
