//! File-based record source (read once).

use crate::model::error::InputError;
use crate::model::ParsedRecord;
use crate::parser::parse_document;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads and parses a whole file at construction.
///
/// The records are handed out by the first [`FileSource::drain_records`] call.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    pending: Vec<ParsedRecord>,
}

impl FileSource {
    /// Load and parse `path`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist.
    /// Returns `InputError::Io` for other I/O errors.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let text = std::fs::read_to_string(path)?;
        let pending = parse_document(&text);
        debug!(path = %path.display(), records = pending.len(), "loaded input file");

        Ok(Self {
            path: path.to_path_buf(),
            pending,
        })
    }

    /// Parse already-loaded `text` as if it had been read from `path`.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            pending: parse_document(text),
        }
    }

    /// Path the records were read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Take the parsed records. Empty after the first call.
    pub fn drain_records(&mut self) -> Vec<ParsedRecord> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn from_text_parses_without_touching_disk() {
        let mut source = FileSource::from_text("inline.json", r#"[{"id": 1}, {"id": 2}, 3]"#);
        let records = source.drain_records();
        assert_eq!(records.len(), 3);
        assert!(records[2].is_malformed());
        assert_eq!(source.path(), Path::new("inline.json"));
    }

    #[test]
    fn drain_returns_records_once() {
        let test_file = std::env::temp_dir().join("vgrid_file_source_drain.jsonl");
        fs::write(&test_file, "{\"name\":\"a\"}\n{\"name\":\"b\"}\n").expect("write");

        let mut source = FileSource::new(&test_file).expect("source");
        let _ = fs::remove_file(&test_file);

        assert_eq!(source.drain_records().len(), 2);
        assert!(source.drain_records().is_empty());
        assert_eq!(source.path(), test_file.as_path());
    }

    #[test]
    fn missing_file_is_reported() {
        let missing = std::env::temp_dir().join("vgrid_missing_file_12345.json");
        let result = FileSource::new(&missing);
        assert!(matches!(result, Err(InputError::FileNotFound { path }) if path == missing));
    }
}
