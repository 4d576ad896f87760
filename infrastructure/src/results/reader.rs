//! File-system result reader

use benchwrap_application::ports::result_reader::ResultReaderPort;
use benchwrap_domain::AdapterError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Reads captured output from the local file system.
///
/// Invalid UTF-8 is replaced rather than rejected; benchmark tools
/// occasionally emit stray bytes in banners.
#[derive(Debug, Clone, Default)]
pub struct FsResultReader;

impl FsResultReader {
    pub fn new() -> Self {
        Self
    }
}

impl ResultReaderPort for FsResultReader {
    fn read(&self, path: &Path) -> Result<String, AdapterError> {
        let target = path.display().to_string();
        if path.is_dir() {
            return Err(AdapterError::resolution(target, "is a directory"));
        }

        let bytes = std::fs::read(path).map_err(|e| {
            let message = match e.kind() {
                ErrorKind::NotFound => "does not exist".to_string(),
                ErrorKind::PermissionDenied => "permission denied".to_string(),
                _ => e.to_string(),
            };
            AdapterError::resolution(&target, message)
        })?;

        debug!(path = %target, bytes = bytes.len(), "Read captured output");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stress.log");
        std::fs::write(&path, "stress: info: [1] successful run completed in 3s\n").unwrap();

        let text = FsResultReader::new().read(&path).unwrap();
        assert!(text.contains("completed in 3s"));
    }

    #[test]
    fn test_missing_file_is_resolution_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.log");

        let err = FsResultReader::new().read(&path).unwrap_err();
        assert_eq!(
            err,
            AdapterError::resolution(path.display().to_string(), "does not exist")
        );
    }

    #[test]
    fn test_directory_is_resolution_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsResultReader::new().read(dir.path()).unwrap_err();
        assert!(err.to_string().contains("is a directory"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banner.log");
        std::fs::write(&path, b"Index Score \xff 12.0\n").unwrap();

        let text = FsResultReader::new().read(&path).unwrap();
        assert!(text.starts_with("Index Score"));
        assert!(text.contains('\u{FFFD}'));
    }
}
