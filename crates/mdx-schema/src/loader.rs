//! # Document Loading
//!
//! Reads a schema or data document from a [`Source`] and parses it into the
//! JSON value model. YAML payloads are converted into the same model so
//! nothing downstream needs to know which syntax the input used.
//!
//! Loading is the only step that touches the filesystem, and it reads
//! exactly the path it is given: no directory scanning, no `$ref`
//! resolution, no network access.
//!
//! ## Failure modes
//!
//! - [`LoadError::Io`]: the path could not be read.
//! - [`LoadError::Parse`]: the payload is not well-formed, or (for data)
//!   its top level is not a mapping.
//! - [`LoadError::SchemaShape`]: the schema parsed but cannot be
//!   validated against (see [`SchemaDocument::from_value`]).

use std::path::Path;

use mdx_core::{DataDocument, DocumentRole, Format, LoadError, ValueKind};
use serde_json::Value;

use crate::schema::SchemaDocument;

/// Where a document comes from.
#[derive(Debug, Clone)]
pub enum Source<'a> {
    /// A file; the format is inferred from the extension.
    Path(&'a Path),
    /// Structured text in the given format.
    Text(&'a str, Format),
    /// UTF-8 bytes in the given format.
    Bytes(&'a [u8], Format),
    /// An already-parsed value.
    Value(Value),
}

impl<'a> Source<'a> {
    pub fn path<P: AsRef<Path> + ?Sized>(path: &'a P) -> Self {
        Source::Path(path.as_ref())
    }

    pub fn json(text: &'a str) -> Self {
        Source::Text(text, Format::Json)
    }

    pub fn yaml(text: &'a str) -> Self {
        Source::Text(text, Format::Yaml)
    }
}

/// Load and shape-check a schema document.
pub fn load_schema(source: Source<'_>) -> Result<SchemaDocument, LoadError> {
    let value = read_value(source, DocumentRole::Schema)?;
    let schema = SchemaDocument::from_value(&value)?;
    for warning in schema.shape_warnings() {
        tracing::warn!(schema = schema.title(), "{warning}");
    }
    tracing::debug!(
        schema = schema.title(),
        properties = schema.properties().len(),
        required = schema.required().len(),
        "loaded schema"
    );
    Ok(schema)
}

/// Load a data document. Its top level must be a mapping.
pub fn load_data(source: Source<'_>) -> Result<DataDocument, LoadError> {
    let (value, format) = match source {
        Source::Value(v) => (v, Format::Json),
        other => {
            let format = source_format(&other);
            (read_value(other, DocumentRole::Data)?, format)
        }
    };
    let data = DataDocument::from_value(value).map_err(|other| {
        LoadError::parse(
            DocumentRole::Data,
            format,
            format!("top-level value must be a mapping, got {}", ValueKind::of(&other)),
        )
    })?;
    tracing::debug!(fields = data.field_count(), "loaded data document");
    Ok(data)
}

fn source_format(source: &Source<'_>) -> Format {
    match source {
        Source::Path(path) => Format::from_path(path),
        Source::Text(_, format) | Source::Bytes(_, format) => *format,
        Source::Value(_) => Format::Json,
    }
}

fn read_value(source: Source<'_>, role: DocumentRole) -> Result<Value, LoadError> {
    match source {
        Source::Path(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
                role,
                path: path.display().to_string(),
                source: e,
            })?;
            parse_text(&content, Format::from_path(path), role)
        }
        Source::Text(text, format) => parse_text(text, format, role),
        Source::Bytes(bytes, format) => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| LoadError::parse(role, format, format!("invalid UTF-8: {e}")))?;
            parse_text(text, format, role)
        }
        Source::Value(value) => Ok(value),
    }
}

fn parse_text(text: &str, format: Format, role: DocumentRole) -> Result<Value, LoadError> {
    match format {
        Format::Json => {
            serde_json::from_str(text).map_err(|e| LoadError::parse(role, format, e.to_string()))
        }
        Format::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(text)
                .map_err(|e| LoadError::parse(role, format, e.to_string()))?;
            yaml_to_json_value(&yaml).map_err(|reason| LoadError::parse(role, format, reason))
        }
    }
}

/// Convert a `serde_yaml::Value` into the JSON value model.
///
/// Tags are dropped, scalar map keys are stringified, and floats JSON cannot
/// represent (NaN, infinities) are rejected.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                out.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(out))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
