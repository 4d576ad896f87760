//! Logging infrastructure for structured result journaling.
//!
//! Provides [`JsonlResultJournal`], a JSONL file writer that implements
//! the [`ResultJournal`](benchwrap_application::ResultJournal) port.

mod jsonl_journal;

pub use jsonl_journal::JsonlResultJournal;
