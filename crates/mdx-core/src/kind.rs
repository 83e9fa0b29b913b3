//! # Value Kinds
//!
//! The JSON data model distinguishes seven kinds of value that a schema can
//! name in a property's `type`. [`ValueKind::of`] classifies a parsed value;
//! [`ValueKind::accepts`] answers whether a value conforms to a declared kind.
//!
//! `integer` is a refinement of `number`: a numeric scalar with zero
//! fractional part, so `3.0` is an integer and `3.5` is not.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;

/// One of the seven type names a property descriptor may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

/// A `type` name outside the seven known kinds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown type name '{0}'")]
pub struct UnknownKind(pub String);

impl ValueKind {
    /// All kinds, in the order the type names are usually listed.
    pub const ALL: [ValueKind; 7] = [
        ValueKind::String,
        ValueKind::Number,
        ValueKind::Integer,
        ValueKind::Boolean,
        ValueKind::Object,
        ValueKind::Array,
        ValueKind::Null,
    ];

    /// Classify a value into its most specific kind.
    ///
    /// Numbers with zero fractional part classify as [`ValueKind::Integer`],
    /// all other numbers as [`ValueKind::Number`].
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(n) if is_integral(n) => ValueKind::Integer,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Whether `value` conforms to this declared kind.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            ValueKind::String => value.is_string(),
            ValueKind::Number => value.is_number(),
            ValueKind::Integer => matches!(value, Value::Number(n) if is_integral(n)),
            ValueKind::Boolean => value.is_boolean(),
            ValueKind::Object => value.is_object(),
            ValueKind::Array => value.is_array(),
            ValueKind::Null => value.is_null(),
        }
    }

    /// The lowercase type name used in schemas and messages.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Integer => "integer",
            ValueKind::Boolean => "boolean",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
            ValueKind::Null => "null",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

fn is_integral(n: &Number) -> bool {
    if n.is_i64() || n.is_u64() {
        return true;
    }
    n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}
