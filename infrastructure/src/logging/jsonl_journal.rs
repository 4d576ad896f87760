//! Append-only JSONL result journal.
//!
//! Every recorded outcome becomes one line:
//!
//! ```text
//! {"seq":0,"type":"run_result","timestamp":"2026-10-16T10:02:11.412Z","pid":4121,"entry":{...}}
//! ```
//!
//! `seq` counts entries written by this process. `pid` tells concurrent
//! invocations apart. The payload sits under `entry` as recorded. Each line
//! goes out in one `write_all` on an append-mode file; the file is never
//! truncated.

use benchwrap_application::ports::result_journal::{JournalEntry, ResultJournal};
use serde::Serialize;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// One journal line.
#[derive(Debug, Serialize)]
struct JournalLine<'a> {
    seq: u64,
    #[serde(rename = "type")]
    kind: &'a str,
    timestamp: String,
    pid: u32,
    entry: &'a Value,
}

impl<'a> JournalLine<'a> {
    fn new(seq: u64, entry: &'a JournalEntry) -> Self {
        Self {
            seq,
            kind: entry.entry_type,
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            pid: std::process::id(),
            entry: &entry.payload,
        }
    }

    fn encode(&self) -> serde_json::Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// Result journal backed by a JSONL file.
pub struct JsonlResultJournal {
    file: Mutex<File>,
    next_seq: AtomicU64,
    path: PathBuf,
}

impl JsonlResultJournal {
    /// Open the journal for appending, creating it and its parent
    /// directories when missing.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            file: Mutex::new(file),
            next_seq: AtomicU64::new(0),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, bytes: &[u8]) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("journal lock poisoned"))?;
        file.write_all(bytes)
    }
}

impl ResultJournal for JsonlResultJournal {
    fn record(&self, entry: JournalEntry) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let written = JournalLine::new(seq, &entry)
            .encode()
            .map_err(io::Error::from)
            .and_then(|bytes| self.append(&bytes));

        if let Err(e) = written {
            warn!(
                path = %self.path.display(),
                entry_type = entry.entry_type,
                error = %e,
                "Journal entry dropped"
            );
        }
    }
}
