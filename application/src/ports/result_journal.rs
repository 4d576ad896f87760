//! Port for structured result journaling.
//!
//! Defines the [`ResultJournal`] trait for recording every invocation outcome
//! (result envelopes and failures) to a machine-readable log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while the journal keeps a durable record of
//! what was run and what it produced (JSONL).

use serde_json::Value;

/// A single journal record.
pub struct JournalEntry {
    /// Entry type identifier (e.g., "run_result", "parse_result", "invocation_failed").
    pub entry_type: &'static str,
    /// JSON payload with entry-specific data.
    pub payload: Value,
}

impl JournalEntry {
    pub fn new(entry_type: &'static str, payload: Value) -> Self {
        Self {
            entry_type,
            payload,
        }
    }
}

/// Port for journaling invocation outcomes.
///
/// `record` is synchronous and non-fallible: a journal that cannot be
/// written must never change the outcome of the invocation.
pub trait ResultJournal: Send + Sync {
    fn record(&self, entry: JournalEntry);
}

/// No-op implementation for tests and when journaling is disabled.
pub struct NoResultJournal;

impl ResultJournal for NoResultJournal {
    fn record(&self, _entry: JournalEntry) {}
}
