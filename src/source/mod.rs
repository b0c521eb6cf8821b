//! Record input sources.
//!
//! This module provides input sources for record data:
//! - File loading for read-once file input
//! - Stdin for piped input (live streaming)
//! - Unified InputSource enum for both

use crate::model::error::InputError;
use crate::model::ParsedRecord;
use std::path::PathBuf;

pub mod file;
pub mod stdin;

pub use file::FileSource;
pub use stdin::StdinSource;

/// Unified input source for record data.
///
/// Abstracts over file loading and stdin sources with a common interface.
#[derive(Debug)]
pub enum InputSource {
    /// File source - read-once loading
    File(FileSource),
    /// Stdin source - reads from piped stdin (live streaming)
    Stdin(StdinSource),
}

impl InputSource {
    /// Poll for new records from the input source.
    ///
    /// Non-blocking - returns immediately with available records.
    ///
    /// # Behavior:
    /// - File: all records on first call, empty vec after
    /// - Stdin: incremental as data arrives
    ///
    /// # Errors
    ///
    /// Returns `InputError` for I/O errors.
    pub fn poll(&mut self) -> Result<Vec<ParsedRecord>, InputError> {
        match self {
            InputSource::File(f) => Ok(f.drain_records()),
            InputSource::Stdin(s) => s.poll_records(),
        }
    }

    /// Check if the source is still live (can receive more data).
    ///
    /// # Behavior:
    /// - File: always false (static, read-once)
    /// - Stdin: true until EOF is reached
    pub fn is_live(&self) -> bool {
        match self {
            InputSource::File(_) => false,
            InputSource::Stdin(s) => !s.is_complete(),
        }
    }
}

/// Detect and create appropriate input source.
///
/// # Logic:
/// 1. If file path is provided: create FileSource (loads on construction)
/// 2. If stdin is piped: use StdinSource
/// 3. Else: return InputError::NoInput
///
/// # Errors
///
/// Returns `InputError::NoInput` if no file is provided and stdin is not piped.
/// Returns `InputError::FileNotFound` if file does not exist.
/// Returns `InputError::Io` for I/O errors during file reading.
pub fn detect_input_source(file: Option<PathBuf>) -> Result<InputSource, InputError> {
    match file {
        Some(path) => Ok(InputSource::File(FileSource::new(path)?)),
        None => Ok(InputSource::Stdin(StdinSource::new()?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::IsTerminal;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn poll_returns_all_records_on_first_call_for_file() {
        use std::fs;

        let test_file = std::env::temp_dir().join("vgrid_poll_test_file.json");
        fs::write(&test_file, r#"[{"name": "u1"}, {"name": "u2"}]"#).expect("write");

        let mut source = detect_input_source(Some(test_file.clone())).expect("source");
        let _ = fs::remove_file(&test_file);

        let result = source.poll().expect("poll");
        assert_eq!(result.len(), 2, "Should return all 2 records on first poll");
        assert!(source.poll().expect("poll").is_empty());
        assert!(!source.is_live(), "File sources are never live");
    }

    #[test]
    fn is_live_returns_false_for_stdin_after_eof() {
        let mut source = InputSource::Stdin(StdinSource::from_reader(&b"{\"name\":\"x\"}\n"[..]));

        let mut records = Vec::new();
        for _ in 0..200 {
            records.extend(source.poll().expect("poll"));
            if !source.is_live() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(records.len(), 1);
        assert!(!source.is_live(), "Stdin source should not be live after EOF");
    }

    #[test]
    fn detect_returns_file_not_found_for_missing_file() {
        let missing_file = std::env::temp_dir().join("vgrid_nonexistent_detect_12345.jsonl");

        let result = detect_input_source(Some(missing_file.clone()));
        match result {
            Err(InputError::FileNotFound { path }) => assert_eq!(path, missing_file),
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn detect_returns_no_input_when_no_file_and_stdin_is_tty() {
        // Only meaningful when the test runner's stdin is a terminal.
        if std::io::stdin().is_terminal() {
            assert!(matches!(detect_input_source(None), Err(InputError::NoInput)));
        }
    }
}
