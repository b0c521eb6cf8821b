//! Dashboard records shown as grid cards.

use serde_json::{Map, Value};

/// Keys tried, in order, for a record's card title.
pub const TITLE_KEYS: &[&str] = &["name", "title", "username", "id", "remark"];

/// One `key: value` line on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordField {
    /// Field name.
    pub key: String,
    /// Display text of the value.
    pub value: String,
}

/// A record parsed from a JSON object.
///
/// The title is taken from the first present key in [`TITLE_KEYS`]; every
/// other key becomes a field, in key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    line: usize,
    title: String,
    fields: Vec<RecordField>,
}

impl Record {
    /// Build a record from a JSON object found at `line` (1-based).
    pub fn from_object(line: usize, object: Map<String, Value>) -> Self {
        let title_key = TITLE_KEYS
            .iter()
            .find(|key| object.get(**key).is_some_and(|v| !v.is_null()))
            .copied();

        let mut title = None;
        let mut fields = Vec::with_capacity(object.len());
        for (key, value) in object {
            if Some(key.as_str()) == title_key {
                title = Some(display_value(&value));
            } else {
                fields.push(RecordField {
                    key,
                    value: display_value(&value),
                });
            }
        }

        Self {
            line,
            title: title.unwrap_or_else(|| format!("#{line}")),
            fields,
        }
    }

    /// Create a record directly.
    pub fn new(line: usize, title: impl Into<String>, fields: Vec<RecordField>) -> Self {
        Self {
            line,
            title: title.into(),
            fields,
        }
    }

    /// Source line (or array position), 1-based.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Card title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Fields in display order.
    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }
}

/// Display text for a JSON value: strings unquoted, `null` as `-`, everything
/// else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// A line of input that could not be turned into a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    line: usize,
    raw: String,
    error_message: String,
}

impl MalformedRecord {
    /// Create a malformed record.
    pub fn new(line: usize, raw: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            line,
            raw: raw.into(),
            error_message: error_message.into(),
        }
    }

    /// Source line (or array position), 1-based.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The raw input that failed to parse.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Human-readable error message.
    pub fn error_message(&self) -> &str {
        &self.error_message
    }
}

/// Result of parsing one record: valid, or kept as an error card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRecord {
    /// Successfully parsed record.
    Valid(Record),
    /// Input that failed to parse.
    Malformed(MalformedRecord),
}

impl ParsedRecord {
    /// Source line (or array position), 1-based.
    pub fn line(&self) -> usize {
        match self {
            Self::Valid(record) => record.line(),
            Self::Malformed(malformed) => malformed.line(),
        }
    }

    /// Whether this is an error card.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}
