//! # Report Rendering
//!
//! Serializes reports as JSON, YAML, or a human-readable text block.
//! The structured formats emit exactly the report value; the text format
//! additionally shows schema descriptive fields and the extraction time,
//! which the caller supplies through [`ReportHeader`] so that extraction
//! itself stays a pure function of its inputs.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::batch::{BatchOutcome, BatchSummary};
use crate::extract::MetadataReport;
use crate::schema::SchemaDocument;

const RULE_WIDTH: usize = 70;

/// Output syntax for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Text,
}

/// An output format name that is not `json`, `yaml`, or `text`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown output format '{0}' (expected json, yaml, or text)")]
pub struct UnknownOutputFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownOutputFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "text" | "txt" => Ok(OutputFormat::Text),
            _ => Err(UnknownOutputFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Text => "text",
        })
    }
}

/// Error while serializing a report.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Context shown in the text format only.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportHeader {
    pub schema_id: Option<String>,
    pub description: Option<String>,
    /// Document kind the summary fields were chosen for, e.g. `patient`.
    pub schema_type: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl ReportHeader {
    pub fn for_schema(schema: &SchemaDocument, generated_at: DateTime<Utc>) -> Self {
        Self {
            schema_id: schema.schema_id().map(str::to_string),
            description: schema.description().map(str::to_string),
            schema_type: None,
            generated_at,
        }
    }

    pub fn with_schema_type(mut self, schema_type: impl Into<String>) -> Self {
        self.schema_type = Some(schema_type.into());
        self
    }
}

/// Render one report.
pub fn render(
    report: &MetadataReport,
    format: OutputFormat,
    header: &ReportHeader,
) -> Result<String, RenderError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        OutputFormat::Text => Ok(TextReport { report, header }.to_string()),
    }
}

/// Render a batch summary.
///
/// The structured formats emit the whole summary, reports included. The
/// text format emits only the tally and the failing entries; callers print
/// the per-pair text reports themselves.
pub fn render_batch(summary: &BatchSummary, format: OutputFormat) -> Result<String, RenderError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(summary)?),
        OutputFormat::Text => Ok(BatchText(summary).to_string()),
    }
}

/// The human-readable report block.
pub struct TextReport<'a> {
    pub report: &'a MetadataReport,
    pub header: &'a ReportHeader,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { report, header } = self;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(f, "METADATA EXTRACTION REPORT - {}", report.schema_title.to_uppercase())?;
        writeln!(f, "{rule}")?;
        writeln!(f)?;

        writeln!(f, "Schema Information:")?;
        writeln!(f, "  Schema Title: {}", or_na(&report.schema_title))?;
        writeln!(f, "  Schema ID: {}", header.schema_id.as_deref().unwrap_or("N/A"))?;
        writeln!(f, "  Description: {}", header.description.as_deref().unwrap_or("N/A"))?;
        writeln!(f)?;

        writeln!(f, "Extraction Details:")?;
        writeln!(
            f,
            "  Timestamp: {}",
            header.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )?;
        writeln!(f, "  Schema Type: {}", header.schema_type.as_deref().unwrap_or("N/A"))?;
        writeln!(f, "  Data ID: {}", or_na(&report.data_id))?;
        writeln!(f, "  Field Count: {}", report.derived.field_count)?;
        writeln!(f, "  Completeness: {:.1}%", report.derived.completeness * 100.0)?;
        writeln!(f)?;

        if !report.data_summary.is_empty() {
            writeln!(f, "Data Summary:")?;
            for (label, value) in &report.data_summary {
                let shown = match value {
                    Value::Null => "N/A".to_string(),
                    other => display_value(other),
                };
                writeln!(f, "  {label}: {shown}")?;
            }
            writeln!(f)?;
        }

        if !report.extracted_metadata.is_empty() {
            writeln!(f, "Embedded Metadata:")?;
            for (key, value) in &report.extracted_metadata {
                writeln!(f, "  {key}: {}", display_value(value))?;
            }
            writeln!(f)?;
        }

        let validation = &report.validation;
        writeln!(f, "Validation Results:")?;
        writeln!(f, "  Valid: {}", validation.valid)?;
        if !validation.errors.is_empty() {
            writeln!(f, "  Errors:")?;
            for error in &validation.errors {
                writeln!(f, "    - {error}")?;
            }
        }
        if !validation.warnings.is_empty() {
            writeln!(f, "  Warnings:")?;
            for warning in &validation.warnings {
                writeln!(f, "    - {warning}")?;
            }
        }
        if validation.errors.is_empty() && validation.warnings.is_empty() {
            writeln!(f, "  No issues found!")?;
        }
        writeln!(f)?;
        writeln!(f, "{rule}")
    }
}

/// Tally and failing entries of a batch.
pub struct BatchText<'a>(pub &'a BatchSummary);

impl fmt::Display for BatchText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        writeln!(f, "Documents: {}/{} passed", summary.passed(), summary.total())?;
        for entry in summary.entries().iter().filter(|e| !e.passed()) {
            match &entry.outcome {
                BatchOutcome::Report(report) => writeln!(
                    f,
                    "  FAIL: {} ({} error(s))",
                    entry.label,
                    report.validation.errors.len()
                )?,
                BatchOutcome::LoadError(reason) => writeln!(f, "  SKIP: {}: {reason}", entry.label)?,
            }
        }
        Ok(())
    }
}

fn or_na(s: &str) -> &str {
    if s.is_empty() {
        "N/A"
    } else {
        s
    }
}

/// Strings print bare; everything else prints as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
