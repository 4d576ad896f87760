//! Parse results use case
//!
//! Reads a previously captured output file and extracts metrics with the
//! adapter's parser, producing a [`ResultEnvelope::Parse`].

use std::path::PathBuf;
use std::sync::Arc;

use benchwrap_domain::{AdapterError, AdapterRegistry, ResultEnvelope};
use serde_json::json;
use tracing::{info, warn};

use crate::ports::result_journal::{JournalEntry, NoResultJournal, ResultJournal};
use crate::ports::result_reader::ResultReaderPort;

/// Input for the ParseResults use case.
#[derive(Debug, Clone)]
pub struct ParseResultsInput {
    /// Adapter id or alias
    pub adapter: String,
    /// Captured output file
    pub source: PathBuf,
}

impl ParseResultsInput {
    pub fn new(adapter: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            adapter: adapter.into(),
            source: source.into(),
        }
    }
}

/// Use case for parsing captured benchmark output.
pub struct ParseResultsUseCase {
    registry: Arc<AdapterRegistry>,
    reader: Arc<dyn ResultReaderPort>,
    journal: Arc<dyn ResultJournal>,
}

impl ParseResultsUseCase {
    pub fn new(registry: Arc<AdapterRegistry>, reader: Arc<dyn ResultReaderPort>) -> Self {
        Self {
            registry,
            reader,
            journal: Arc::new(NoResultJournal),
        }
    }

    pub fn with_journal(mut self, journal: Arc<dyn ResultJournal>) -> Self {
        self.journal = journal;
        self
    }

    /// Parse the captured output.
    ///
    /// # Errors
    ///
    /// - [`AdapterError::UnknownAdapter`] - no adapter registered under that name
    /// - [`AdapterError::Validation`] - the adapter has no parser for its output
    /// - [`AdapterError::Resolution`] - the source file is missing or unreadable
    /// - [`AdapterError::Parse`] - malformed input or no metrics extracted
    pub fn execute(&self, input: ParseResultsInput) -> Result<ResultEnvelope, AdapterError> {
        let result = self.parse(&input);
        match &result {
            Ok(envelope) => self.journal.record(JournalEntry::new(
                "parse_result",
                json!({ "envelope": envelope }),
            )),
            Err(e) => {
                warn!(adapter = %input.adapter, source = %input.source.display(), "Parse failed: {}", e);
                self.journal.record(JournalEntry::new(
                    "invocation_failed",
                    json!({
                        "mode": "parse",
                        "adapter": input.adapter,
                        "source": input.source,
                        "category": e.category().as_str(),
                        "error": e.to_string(),
                    }),
                ));
            }
        }
        result
    }

    fn parse(&self, input: &ParseResultsInput) -> Result<ResultEnvelope, AdapterError> {
        let adapter = self.registry.lookup(&input.adapter)?;
        if !adapter.descriptor().produces_parseable_output {
            return Err(AdapterError::validation(
                adapter.id(),
                "source",
                "this benchmark's output cannot be parsed",
            ));
        }

        let text = self.reader.read(&input.source)?;
        let origin = input.source.display().to_string();
        let metrics = adapter
            .parse(&text)
            .map_err(|failure| failure.into_adapter_error(origin))?;

        info!(
            adapter = adapter.id(),
            source = %input.source.display(),
            metrics = metrics.len(),
            "Parsed benchmark output"
        );
        Ok(ResultEnvelope::from_metrics(
            adapter.id(),
            input.source.clone(),
            metrics,
        ))
    }
}
