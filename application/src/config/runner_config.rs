//! Runner configuration: how programs are located.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Program resolution settings for the process runner.
///
/// Resolution order for a program name:
///
/// 1. the invocation's `executable` parameter (directory or full path)
/// 2. an explicit entry in [`executables`](Self::executables)
/// 3. `PATH`
/// 4. each directory in [`search_paths`](Self::search_paths), in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Fallback directories searched after `PATH`
    pub search_paths: Vec<PathBuf>,
    /// Program name → explicit path overrides
    pub executables: BTreeMap<String, PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            search_paths: vec![PathBuf::from("/usr/local/bin")],
            executables: BTreeMap::new(),
        }
    }
}

impl RunnerConfig {
    pub fn with_search_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_executable(mut self, program: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.executables.insert(program.into(), path.into());
        self
    }

    /// Explicit override for `program`, if configured
    pub fn executable_override(&self, program: &str) -> Option<&PathBuf> {
        self.executables.get(program)
    }
}
