//! Result reader port
//!
//! Defines how parse mode obtains the text of a previously captured output file.

use benchwrap_domain::AdapterError;
use std::path::Path;

/// Port for reading captured benchmark output.
///
/// A missing or unreadable source is an [`AdapterError::Resolution`].
pub trait ResultReaderPort: Send + Sync {
    fn read(&self, path: &Path) -> Result<String, AdapterError>;
}
