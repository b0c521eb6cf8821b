//! Record parser.
//!
//! Accepts either a JSON array of objects or JSONL (one object per line).
//! The format is detected from the first non-blank line: a leading `[` starts
//! an array document, anything else is read as JSONL. Parsing never fails as a
//! whole; bad input becomes [`MalformedRecord`]s shown as error cards.

use crate::model::{MalformedRecord, ParseError, ParsedRecord, Record};
use serde_json::Value;
use tracing::warn;

/// Longest raw snippet kept on a malformed card.
const MAX_RAW_SNIPPET: usize = 200;

/// Parse a single JSON object into a [`Record`].
///
/// # Errors
///
/// Returns `ParseError::InvalidJson` for malformed JSON and
/// `ParseError::NotAnObject` for any other JSON value.
pub fn parse_record(raw: &str, line_number: usize) -> Result<Record, ParseError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| ParseError::InvalidJson {
        line: line_number,
        message: e.to_string(),
    })?;
    record_from_value(value, line_number)
}

/// Parse a single JSONL line gracefully.
///
/// Unlike [`parse_record`], this never returns an error: failures are logged
/// and kept as a [`MalformedRecord`].
pub fn parse_record_graceful(raw: &str, line_number: usize) -> ParsedRecord {
    match parse_record(raw, line_number) {
        Ok(record) => ParsedRecord::Valid(record),
        Err(error) => malformed(raw, &error),
    }
}

/// Parse a whole document (JSON array or JSONL).
pub fn parse_document(text: &str) -> Vec<ParsedRecord> {
    let mut stream = RecordStream::new();
    let mut records = Vec::new();
    for line in text.lines() {
        records.extend(stream.push_line(line));
    }
    records.extend(stream.finish());
    records
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Detect,
    Lines,
    Array { buffer: String, start_line: usize },
}

/// Incremental parser fed one line at a time.
///
/// JSONL records are emitted as soon as their line arrives. A JSON array is
/// buffered and emitted by [`RecordStream::finish`], since it can only be
/// parsed once complete.
#[derive(Debug, Clone)]
pub struct RecordStream {
    line: usize,
    mode: Mode,
}

impl RecordStream {
    /// Create a stream in format-detection state.
    pub fn new() -> Self {
        Self {
            line: 0,
            mode: Mode::Detect,
        }
    }

    /// Number of lines consumed so far.
    pub fn lines_seen(&self) -> usize {
        self.line
    }

    /// Whether the stream is buffering a JSON array.
    pub fn is_buffering(&self) -> bool {
        matches!(self.mode, Mode::Array { .. })
    }

    /// Feed one line (without its terminator). Returns records completed by it.
    pub fn push_line(&mut self, raw: &str) -> Vec<ParsedRecord> {
        self.line += 1;
        let trimmed = raw.trim();

        if let Mode::Array { buffer, .. } = &mut self.mode {
            buffer.push_str(raw);
            buffer.push('\n');
            return Vec::new();
        }

        if self.mode == Mode::Detect {
            if trimmed.is_empty() {
                return Vec::new();
            }
            if trimmed.starts_with('[') {
                self.mode = Mode::Array {
                    buffer: format!("{raw}\n"),
                    start_line: self.line,
                };
                return Vec::new();
            }
            self.mode = Mode::Lines;
        }

        if trimmed.is_empty() {
            return Vec::new();
        }
        vec![parse_record_graceful(trimmed, self.line)]
    }

    /// Signal end of input. Returns any buffered records.
    pub fn finish(&mut self) -> Vec<ParsedRecord> {
        match std::mem::replace(&mut self.mode, Mode::Lines) {
            Mode::Array { buffer, start_line } => parse_array(&buffer, start_line),
            _ => Vec::new(),
        }
    }
}

impl Default for RecordStream {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a complete JSON array document. Element records are numbered by
/// their 1-based position in the array.
fn parse_array(buffer: &str, start_line: usize) -> Vec<ParsedRecord> {
    match serde_json::from_str::<Vec<Value>>(buffer) {
        Ok(values) => values
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                let position = i + 1;
                let raw = value.to_string();
                match record_from_value(value, position) {
                    Ok(record) => ParsedRecord::Valid(record),
                    Err(error) => malformed(&raw, &error),
                }
            })
            .collect(),
        Err(e) => {
            let error = ParseError::InvalidJson {
                line: start_line + e.line().saturating_sub(1),
                message: e.to_string(),
            };
            vec![malformed(buffer, &error)]
        }
    }
}

fn record_from_value(value: Value, line_number: usize) -> Result<Record, ParseError> {
    match value {
        Value::Object(map) => Ok(Record::from_object(line_number, map)),
        other => Err(ParseError::NotAnObject {
            line: line_number,
            found: value_kind(&other),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn malformed(raw: &str, error: &ParseError) -> ParsedRecord {
    warn!(line = error.line(), error = %error, "malformed record");
    let snippet: String = raw.trim().chars().take(MAX_RAW_SNIPPET).collect();
    ParsedRecord::Malformed(MalformedRecord::new(error.line(), snippet, error.to_string()))
}
