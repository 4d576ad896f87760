//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.

mod journal;
mod logging;
mod output;
mod runner;

pub use journal::FileJournalConfig;
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use runner::FileRunnerConfig;

use benchwrap_application::RunnerConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// How serious a configuration issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A problem detected in a loaded configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted path of the offending key (e.g. `runner.search_paths`)
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }

    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Program search settings
    pub runner: FileRunnerConfig,
    /// Program name → explicit executable path
    pub executables: BTreeMap<String, PathBuf>,
    /// Output settings
    pub output: FileOutputConfig,
    /// Result journal settings
    pub journal: FileJournalConfig,
    /// Diagnostic log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        for path in &self.runner.search_paths {
            if !path.is_dir() {
                issues.push(ConfigIssue::warning(
                    "runner.search_paths",
                    format!("{} is not a directory, it will be skipped", path.display()),
                ));
            }
        }

        for (program, path) in &self.executables {
            if path.as_os_str().is_empty() {
                issues.push(ConfigIssue::error(
                    format!("executables.{}", program),
                    "path cannot be empty",
                ));
            } else if !path.is_file() {
                issues.push(ConfigIssue::warning(
                    format!("executables.{}", program),
                    format!("{} does not exist", path.display()),
                ));
            }
        }

        if let Some(path) = &self.journal.path
            && path.is_dir()
        {
            issues.push(ConfigIssue::error(
                "journal.path",
                format!("{} is a directory", path.display()),
            ));
        }

        issues
    }

    /// Runner settings as consumed by the process runner
    pub fn to_runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            search_paths: self.runner.search_paths.clone(),
            executables: self.executables.clone(),
        }
    }
}
