//! The counter record: `{ "<PREFIX>": { "next": <N> }, ... }`.
//!
//! Other tools read `next` to allocate identifiers for new documents. This
//! crate only ever changes one prefix's `next`; every other key, nested or
//! top-level, is carried through in its original order.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Result, TicketError};

/// In-memory form of the counter record file.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterRecord {
    entries: Map<String, Value>,
}

impl CounterRecord {
    /// Parse a counter record from JSON text.
    ///
    /// `path` is only used for error messages.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::CounterParse`] if the text is not JSON or its
    /// root is not an object.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| TicketError::CounterParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(TicketError::CounterParse {
                path: path.to_path_buf(),
                message: format!("expected a JSON object at the root, found {}", kind(&other)),
            }),
        }
    }

    /// Read and parse the counter record at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::Io`] if the file cannot be read, otherwise as
    /// [`CounterRecord::parse`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| TicketError::io(path, e))?;
        Self::parse(&text, path)
    }

    /// The `next` value recorded for `prefix`, if present and numeric.
    pub fn next(&self, prefix: &str) -> Option<u64> {
        self.entries.get(prefix)?.get("next")?.as_u64()
    }

    /// Set `<prefix>.next`, creating the prefix entry if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::CounterShape`] if the existing entry is not
    /// an object.
    pub fn set_next(&mut self, prefix: &str, next: u64) -> Result<()> {
        let entry = self
            .entries
            .entry(prefix.to_string())
            .or_insert_with(|| Value::Object(Map::new()));

        match entry {
            Value::Object(fields) => {
                fields.insert("next".to_string(), Value::from(next));
                Ok(())
            }
            other => Err(TicketError::CounterShape {
                prefix: prefix.to_string(),
                message: format!("expected an object, found {}", kind(other)),
            }),
        }
    }

    /// Serialize with two-space indentation and a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::Serialization`] if serialization fails.
    pub fn render(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| TicketError::Serialization(e.to_string()))?;
        text.push('\n');
        Ok(text)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
