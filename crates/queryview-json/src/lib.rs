// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON file record source for queryview.
//!
//! [`JsonFileSource`] reads a file holding a top-level JSON array of flat
//! objects. Every [`enumerate`](queryview::RecordSource::enumerate) re-reads
//! the file; memoization is the view cache's job, so
//! [`View::refresh`](queryview::View::refresh) picks up edits made on disk.
//!
//! # Accepted Shape
//!
//! ```json
//! [
//!   {"id": 1, "title": "Dune", "tags": ["scifi", "classic"]},
//!   {"id": 2, "title": "Emma", "rating": 4.5, "isbn": null}
//! ]
//! ```
//!
//! Integral numbers decode as `Int`, other numbers as `Float`, arrays as
//! `List` (recursively). Objects nested inside a record are rejected.
#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use queryview::{MapRecord, RecordSource, Value};
use thiserror::Error;
use tracing::debug;

/// Failure while loading records from JSON.
#[derive(Debug, Error)]
pub enum JsonSourceError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The bytes were not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The top-level value was not an array.
    #[error("expected a top-level JSON array of objects")]
    NotAnArray,
    /// An array element was not an object.
    #[error("record {index} is not a JSON object")]
    NotAnObject {
        /// Position of the offending element.
        index: usize,
    },
    /// A field held a nested object.
    #[error("record {index} field {field:?} holds a nested object")]
    NestedObject {
        /// Position of the offending record.
        index: usize,
        /// Offending field name.
        field: String,
    },
}

/// Decode a JSON array of flat objects into records, preserving order.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<MapRecord>, JsonSourceError> {
    let doc: serde_json::Value = serde_json::from_slice(bytes)?;
    let serde_json::Value::Array(items) = doc else {
        return Err(JsonSourceError::NotAnArray);
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let serde_json::Value::Object(fields) = item else {
                return Err(JsonSourceError::NotAnObject { index });
            };
            fields
                .into_iter()
                .map(|(field, raw)| match convert(raw) {
                    Some(value) => Ok((field, value)),
                    None => Err(JsonSourceError::NestedObject { index, field }),
                })
                .collect::<Result<MapRecord, _>>()
        })
        .collect()
}

/// `None` if `raw` is or contains an object.
fn convert(raw: serde_json::Value) -> Option<Value> {
    use serde_json::Value as J;
    Some(match raw {
        J::Null => Value::Null,
        J::Bool(b) => Value::Bool(b),
        J::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        J::String(s) => Value::Str(s),
        J::Array(items) => Value::List(items.into_iter().map(convert).collect::<Option<_>>()?),
        J::Object(_) => return None,
    })
}

/// Record source backed by a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    model: Arc<str>,
}

impl JsonFileSource {
    /// Source reading `path`. Nothing is read until enumeration.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            model: Arc::from("record"),
        }
    }

    /// Set the model label used in "not found" errors.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Arc::from(model);
        self
    }

    /// File this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for JsonFileSource {
    type Record = MapRecord;
    type Error = JsonSourceError;

    fn enumerate(&self) -> Result<Vec<MapRecord>, JsonSourceError> {
        let bytes = fs::read(&self.path).map_err(|source| JsonSourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let records = parse_records(&bytes)?;
        debug!(path = %self.path.display(), records = records.len(), "read json records");
        Ok(records)
    }

    fn requery(&self) -> Result<Self, JsonSourceError> {
        Ok(self.clone())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
