//! Adapter value objects: immutable outcome and result types
//!
//! These types form the **output side** of an invocation:
//!
//! ```text
//! run mode:   CommandSpec ─► ProcessRunner ─► ExecutionOutcome ─► ResultEnvelope::Run
//! parse mode: text ─► OutputParser ─► ParsedMetrics ─► ResultEnvelope::Parse
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::command::render_command_line;

/// Value of one extracted metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Accumulated or counted numeric value
    Count(i64),
    /// Value copied verbatim from the tool's output
    Text(String),
    /// Ordered list of verbatim lines
    List(Vec<String>),
    /// Structured document emitted natively by the tool
    Document(serde_json::Value),
}

impl MetricValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetricValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<i64> {
        match self {
            MetricValue::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            MetricValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{}", n),
            MetricValue::Text(s) => write!(f, "{}", s),
            MetricValue::List(items) => write!(f, "[{}]", items.join("; ")),
            MetricValue::Document(doc) => write!(f, "{}", doc),
        }
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Count(value)
    }
}

impl From<i32> for MetricValue {
    fn from(value: i32) -> Self {
        MetricValue::Count(i64::from(value))
    }
}

impl From<Vec<String>> for MetricValue {
    fn from(value: Vec<String>) -> Self {
        MetricValue::List(value)
    }
}

/// Ordered mapping from metric label to value.
///
/// Insertion order follows the order in which the tool printed the metrics.
/// Re-inserting a label keeps its original position and replaces the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedMetrics {
    entries: IndexMap<String, MetricValue>,
}

impl ParsedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<MetricValue>) {
        self.entries.insert(label.into(), value.into());
    }

    pub fn with(mut self, label: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        self.insert(label, value);
        self
    }

    pub fn get(&self, label: &str) -> Option<&MetricValue> {
        self.entries.get(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of executing one command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Exact argument vector executed, with resolved program paths
    pub argv: Vec<String>,
    /// Directory the child ran in, when not inherited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionOutcome {
    pub fn command_line(&self) -> String {
        render_command_line(&self.argv)
    }
}

/// Run-mode response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub adapter: String,
    pub changed: bool,
    pub exec_cmd: String,
    pub argv: Vec<String>,
    pub stdout: String,
    pub stderr: String,
    pub rc: i32,
}

/// Parse-mode response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub adapter: String,
    pub changed: bool,
    pub source: PathBuf,
    pub results: ParsedMetrics,
}

/// Uniform response returned by every invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResultEnvelope {
    Run(RunResult),
    Parse(ParseResult),
}

impl ResultEnvelope {
    /// Wrap an execution outcome. Trailing line breaks are trimmed from the
    /// captured streams.
    pub fn from_outcome(adapter: impl Into<String>, outcome: ExecutionOutcome) -> Self {
        let exec_cmd = outcome.command_line();
        ResultEnvelope::Run(RunResult {
            adapter: adapter.into(),
            changed: true,
            exec_cmd,
            argv: outcome.argv,
            stdout: outcome.stdout.trim_end_matches(['\r', '\n']).to_string(),
            stderr: outcome.stderr.trim_end_matches(['\r', '\n']).to_string(),
            rc: outcome.exit_code,
        })
    }

    pub fn from_metrics(
        adapter: impl Into<String>,
        source: impl Into<PathBuf>,
        metrics: ParsedMetrics,
    ) -> Self {
        ResultEnvelope::Parse(ParseResult {
            adapter: adapter.into(),
            changed: true,
            source: source.into(),
            results: metrics,
        })
    }

    pub fn adapter(&self) -> &str {
        match self {
            ResultEnvelope::Run(r) => &r.adapter,
            ResultEnvelope::Parse(p) => &p.adapter,
        }
    }

    pub fn changed(&self) -> bool {
        match self {
            ResultEnvelope::Run(r) => r.changed,
            ResultEnvelope::Parse(p) => p.changed,
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            ResultEnvelope::Run(_) => "run",
            ResultEnvelope::Parse(_) => "parse",
        }
    }
}
