//! Result journal configuration from TOML (`[journal]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw journal configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileJournalConfig {
    /// JSONL file every result envelope is appended to; disabled when unset
    pub path: Option<PathBuf>,
}
