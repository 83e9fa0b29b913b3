//! # Data Summaries
//!
//! A data summary is a short, ordered list of labelled values picked out of
//! a data document, such as a patient's name or a study's enrollment
//! progress. Which values are picked depends on the kind of document, so the
//! summary is driven by a list of [`SummaryField`]s chosen per schema type
//! rather than by code.
//!
//! A field's `source` is either a dotted path or a template:
//!
//! ```text
//! metadata.status                                   -> the value, or null
//! {personalInfo.firstName} {personalInfo.lastName}  -> "Maria Lindqvist"
//! {enrollment.actual|0}/{enrollment.target|0}       -> "87/240"
//! ```
//!
//! Path segments step into mappings by key and into arrays by index. In a
//! template, a missing value renders as the text after `|`, or as nothing.

use std::collections::BTreeMap;

use mdx_core::DataDocument;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One labelled entry of a data summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummaryField {
    pub label: String,
    /// Dotted path or `{path}` template.
    pub source: String,
}

impl SummaryField {
    pub fn new(label: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            source: source.into(),
        }
    }

    /// Resolve this field against `data`.
    pub fn resolve(&self, data: &DataDocument) -> Value {
        if self.source.contains('{') {
            Value::String(fill_template(&self.source, data))
        } else {
            lookup(data, &self.source).cloned().unwrap_or(Value::Null)
        }
    }
}

/// Build the summary mapping for `data`, in field order.
///
/// A label that appears twice keeps its first position and its last value.
pub fn summarize(fields: &[SummaryField], data: &DataDocument) -> Map<String, Value> {
    fields
        .iter()
        .map(|field| (field.label.clone(), field.resolve(data)))
        .collect()
}

/// Look up a dotted path in `data`.
pub fn lookup<'a>(data: &'a DataDocument, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = data.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn fill_template(template: &str, data: &DataDocument) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            // Unterminated placeholder: keep the remainder verbatim.
            out.push_str(&rest[open..]);
            return out;
        };
        let placeholder = &after[..close];
        let (path, fallback) = placeholder.split_once('|').unwrap_or((placeholder, ""));
        match lookup(data, path.trim()) {
            Some(Value::Null) | None => out.push_str(fallback),
            Some(Value::String(s)) => out.push_str(s),
            Some(other) => out.push_str(&other.to_string()),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Summary fields for the sample document types, keyed by schema type.
pub fn default_summary_table() -> BTreeMap<String, Vec<SummaryField>> {
    let table = [
        (
            "patient",
            vec![
                SummaryField::new("patient_id", "patientId"),
                SummaryField::new("name", "{personalInfo.firstName} {personalInfo.lastName}"),
                SummaryField::new("status", "metadata.status"),
                SummaryField::new("last_visit", "metadata.lastVisit"),
            ],
        ),
        (
            "medical_record",
            vec![
                SummaryField::new("record_id", "recordId"),
                SummaryField::new("patient_id", "patientInfo.patientId"),
                SummaryField::new("record_type", "recordType"),
                SummaryField::new("record_date", "recordDate"),
                SummaryField::new("provider", "provider.name"),
            ],
        ),
        (
            "clinical_study",
            vec![
                SummaryField::new("study_id", "studyId"),
                SummaryField::new("title", "title"),
                SummaryField::new("status", "status"),
                SummaryField::new("phase", "phase"),
                SummaryField::new(
                    "enrollment_progress",
                    "{enrollment.actual|0}/{enrollment.target|0}",
                ),
            ],
        ),
    ];
    table
        .into_iter()
        .map(|(schema_type, fields)| (schema_type.to_string(), fields))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> DataDocument {
        DataDocument::from_value(value).unwrap()
    }

    #[test]
    fn lookup_walks_mappings_and_arrays() {
        let d = data(json!({
            "provider": {"name": "Dr. Okafor"},
            "diagnosis": [{"code": "I10"}]
        }));
        assert_eq!(lookup(&d, "provider.name"), Some(&json!("Dr. Okafor")));
        assert_eq!(lookup(&d, "diagnosis.0.code"), Some(&json!("I10")));
        assert_eq!(lookup(&d, "diagnosis.1.code"), None);
        assert_eq!(lookup(&d, "provider.name.first"), None);
        assert_eq!(lookup(&d, "absent"), None);
    }

    #[test]
    fn path_source_missing_is_null() {
        let field = SummaryField::new("status", "metadata.status");
        assert_eq!(field.resolve(&data(json!({}))), Value::Null);
        assert_eq!(
            field.resolve(&data(json!({"metadata": {"status": "active"}}))),
            json!("active")
        );
    }

    #[test]
    fn path_source_keeps_value_kind() {
        let field = SummaryField::new("target", "enrollment.target");
        assert_eq!(field.resolve(&data(json!({"enrollment": {"target": 240}}))), json!(240));
    }

    #[test]
    fn template_joins_values_and_applies_fallback() {
        let progress = SummaryField::new("progress", "{enrollment.actual|0}/{enrollment.target|0}");
        assert_eq!(
            progress.resolve(&data(json!({"enrollment": {"actual": 87, "target": 240}}))),
            json!("87/240")
        );
        assert_eq!(progress.resolve(&data(json!({}))), json!("0/0"));

        let name = SummaryField::new("name", "{personalInfo.firstName} {personalInfo.lastName}");
        assert_eq!(name.resolve(&data(json!({}))), json!(" "));
    }

    #[test]
    fn unterminated_placeholder_is_literal() {
        let field = SummaryField::new("x", "id={id");
        assert_eq!(field.resolve(&data(json!({"id": "A"}))), json!("id={id"));
    }

    #[test]
    fn summarize_keeps_field_order() {
        let table = default_summary_table();
        let summary = summarize(
            &table["medical_record"],
            &data(json!({"recordId": "MR-1", "recordType": "lab", "provider": {"name": "Dr. A"}})),
        );
        let labels: Vec<&str> = summary.keys().map(String::as_str).collect();
        assert_eq!(labels, ["record_id", "patient_id", "record_type", "record_date", "provider"]);
        assert_eq!(summary["patient_id"], Value::Null);
        assert_eq!(summary["provider"], json!("Dr. A"));
    }

    #[test]
    fn default_table_covers_sample_types() {
        let table = default_summary_table();
        let types: Vec<&str> = table.keys().map(String::as_str).collect();
        assert_eq!(types, ["clinical_study", "medical_record", "patient"]);
    }

    #[test]
    fn summary_field_from_yaml() {
        let fields: Vec<SummaryField> =
            serde_yaml::from_str("- label: mrn\n  source: identifiers.0.value\n").unwrap();
        assert_eq!(fields, vec![SummaryField::new("mrn", "identifiers.0.value")]);
        assert!(serde_yaml::from_str::<Vec<SummaryField>>("- label: a\n  path: b\n").is_err());
    }
}
