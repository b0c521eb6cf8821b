//! Error types for the vgrid application.
//!
//! This module defines the error taxonomy of the record browser using `thiserror`.
//! Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level application error wrapping all domain-specific failures
//!   - [`InputError`] - File/stdin reading failures (file not found, no input, IO)
//!   - [`ParseError`] - Record parsing failures (malformed JSON, non-object values)
//!   - [`LayoutConfigError`] - Invalid grid configuration
//!   - `std::io::Error` - Terminal/TUI rendering failures
//!
//! # Error Recovery Strategy
//!
//! Parsing errors are **non-fatal**: a malformed line becomes an error card in
//! the grid and a `warn!` in the log file, and the rest of the input is still
//! shown. Input, configuration and terminal errors are fatal.

use crate::grid::LayoutConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all failure modes.
///
/// # Examples
///
/// ```no_run
/// use vgrid::model::error::{AppError, InputError};
///
/// fn run_app() -> Result<(), AppError> {
///     // InputError automatically converts to AppError via From
///     let _input = read_records()?;
///     Ok(())
/// }
/// # fn read_records() -> Result<(), InputError> { Ok(()) }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read input from file or stdin. Fatal.
    #[error("Failed to read input: {0}")]
    InputRead(#[from] InputError),

    /// Failed to parse a record.
    ///
    /// Only surfaces here when a caller asks for strict parsing; the browser
    /// itself turns these into malformed cards.
    #[error("Failed to parse record: {0}")]
    Parse(#[from] ParseError),

    /// The resolved grid configuration is invalid. Fatal.
    #[error("Invalid grid configuration: {0}")]
    Layout(#[from] LayoutConfigError),

    /// Terminal or TUI rendering error. Fatal.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors encountered when reading record input from files or stdin.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified file does not exist at the given path.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use vgrid::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.json")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.json"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The filesystem path that was not found.
        path: PathBuf,
    },

    /// No input source was provided: the user must supply a file path or pipe stdin.
    ///
    /// Occurs when no path argument is given and stdin is a TTY.
    #[error("No input source: provide a file path or pipe data to stdin")]
    NoInput,

    /// Generic I/O error reading from input source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors encountered when parsing records.
///
/// Non-fatal: each one becomes a malformed card. All variants carry the
/// 1-based line number (JSONL) or element position (JSON array).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A line or document contains syntactically invalid JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use vgrid::model::error::ParseError;
    ///
    /// let err = ParseError::InvalidJson {
    ///     line: 42,
    ///     message: "expected value at line 1 column 1".to_string()
    /// };
    /// assert!(err.to_string().contains("line 42"));
    /// ```
    #[error("Invalid JSON at line {line}: {message}")]
    InvalidJson {
        /// 1-based line number (or array position) of the failure.
        line: usize,
        /// The `serde_json` error message.
        message: String,
    },

    /// Valid JSON, but not an object.
    #[error("Expected a JSON object at line {line}, found {found}")]
    NotAnObject {
        /// 1-based line number (or array position).
        line: usize,
        /// Kind of value found instead (`array`, `string`, ...).
        found: &'static str,
    },
}

impl ParseError {
    /// Line number (or array position) the error refers to.
    pub fn line(&self) -> usize {
        match self {
            Self::InvalidJson { line, .. } | Self::NotAnObject { line, .. } => *line,
        }
    }
}
