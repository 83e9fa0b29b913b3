//! # Data Documents
//!
//! A [`DataDocument`] is a parsed data instance: a top-level mapping from
//! field name to an arbitrary value. Field order is the order of the
//! source document.
//!
//! Two read-only views are derived from it without failing:
//!
//! - [`DataDocument::metadata`]: the nested `metadata` mapping, if any.
//! - [`DataDocument::find_identifier`]: the first identifier-like field
//!   from a priority list.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier field names consulted for a document's id, highest priority
/// first.
pub const DEFAULT_ID_FIELDS: [&str; 4] = ["id", "patientId", "recordId", "studyId"];

/// Field name of the embedded metadata block.
pub const METADATA_FIELD: &str = "metadata";

/// A parsed data instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataDocument {
    fields: Map<String, Value>,
}

impl DataDocument {
    /// Wrap an already-parsed mapping.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Convert a parsed value into a document. Returns the value back
    /// if it is not a mapping.
    pub fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(other),
        }
    }

    /// Look up a top-level field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Whether a top-level field is present (a `null` value counts).
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of top-level keys.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Iterate top-level field names in document order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The embedded `metadata` mapping, if present and a mapping.
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.fields.get(METADATA_FIELD).and_then(Value::as_object)
    }

    /// Best-effort document id: the value of the first field in `priority`
    /// that is present and holds a string or a number.
    ///
    /// Fields holding any other kind of value are skipped.
    pub fn find_identifier<S: AsRef<str>>(&self, priority: &[S]) -> Option<String> {
        priority.iter().find_map(|name| match self.fields.get(name.as_ref()) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    /// Borrow the underlying mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consume the document and return it as a generic value.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl From<Map<String, Value>> for DataDocument {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}
