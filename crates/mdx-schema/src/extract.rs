//! # Metadata Extraction
//!
//! Builds a [`MetadataReport`] for one schema/data pair: the schema title,
//! a best-effort document id, the embedded `metadata` mapping, an optional
//! data summary, derived statistics, and a fresh validation.
//!
//! Extraction is a pure function of its inputs. It never fails: a missing
//! or non-mapping `metadata` block yields an empty mapping, and a document
//! with no identifier-like field yields an empty id.

use mdx_core::{DataDocument, DEFAULT_ID_FIELDS};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::SchemaDocument;
use crate::summary::{summarize, SummaryField};
use crate::validate::{ValidationOptions, ValidationResult, Validator};

/// Statistics derived from the data document relative to its schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedStats {
    /// Number of top-level keys in the data document.
    pub field_count: usize,
    /// Share of optional properties present, in `[0, 1]`.
    pub completeness: f64,
}

/// Report produced for one schema/data pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataReport {
    pub schema_title: String,
    /// Value of the first identifier-like field, or empty.
    pub data_id: String,
    /// The data's `metadata` mapping, or empty.
    pub extracted_metadata: Map<String, Value>,
    /// Values picked by [`ExtractOptions::summary_fields`], omitted when empty.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data_summary: Map<String, Value>,
    pub derived: DerivedStats,
    pub validation: ValidationResult,
}

/// Tunables for [`Extractor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Identifier field names, highest priority first.
    pub id_fields: Vec<String>,
    /// Data summary entries, in display order. Empty means no summary.
    #[serde(default)]
    pub summary_fields: Vec<SummaryField>,
    /// Options for the validation embedded in every report.
    pub validation: ValidationOptions,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            id_fields: DEFAULT_ID_FIELDS.iter().map(|s| (*s).to_string()).collect(),
            summary_fields: Vec::new(),
            validation: ValidationOptions::default(),
        }
    }
}

/// Metadata extractor carrying [`ExtractOptions`].
#[derive(Debug, Clone)]
pub struct Extractor {
    id_fields: Vec<String>,
    summary_fields: Vec<SummaryField>,
    validator: Validator,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            id_fields: options.id_fields,
            summary_fields: options.summary_fields,
            validator: Validator::new(options.validation),
        }
    }

    /// The validator used for the report's `validation` section.
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Build the report for `data` under `schema`.
    ///
    /// The report's validation is computed by [`Extractor::validator`], so
    /// it equals `self.validator().validate(schema, data)`.
    pub fn extract(&self, schema: &SchemaDocument, data: &DataDocument) -> MetadataReport {
        MetadataReport {
            schema_title: schema.title().to_string(),
            data_id: data.find_identifier(&self.id_fields).unwrap_or_default(),
            extracted_metadata: data.metadata().cloned().unwrap_or_default(),
            data_summary: summarize(&self.summary_fields, data),
            derived: DerivedStats {
                field_count: data.field_count(),
                completeness: completeness(schema, data),
            },
            validation: self.validator.validate(schema, data),
        }
    }
}

/// Build the report for `data` under `schema` with default options.
pub fn extract_metadata(schema: &SchemaDocument, data: &DataDocument) -> MetadataReport {
    Extractor::default().extract(schema, data)
}

/// Share of the schema's optional properties present in `data`.
///
/// Defined as `1.0` when the schema declares no optional properties.
pub fn completeness(schema: &SchemaDocument, data: &DataDocument) -> f64 {
    let (declared, present) = schema
        .optional_properties()
        .fold((0usize, 0usize), |(declared, present), name| {
            (declared + 1, present + usize::from(data.contains(name)))
        });
    if declared == 0 {
        1.0
    } else {
        present as f64 / declared as f64
    }
}
