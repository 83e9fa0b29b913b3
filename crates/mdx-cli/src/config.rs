//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`. Every key is optional;
//! command-line flags take precedence over the file.
//!
//! ```yaml
//! id_fields: [id, patientId, recordId, studyId]
//! recommended_fields: [contactInfo]
//! format: text
//! embed_base_metadata: true
//! summary_fields:
//!   patient:
//!     - label: name
//!       source: "{personalInfo.firstName} {personalInfo.lastName}"
//!     - label: status
//!       source: metadata.status
//! ```
//!
//! `summary_fields` entries replace the built-in summary for that schema
//! type; types without an entry keep the built-in one, if any.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use mdx_schema::{default_summary_table, ExtractOptions, OutputFormat, SummaryField, ValidationOptions};

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Identifier priority list; `None` keeps the built-in list.
    pub id_fields: Option<Vec<String>>,
    /// Top-level fields whose absence is reported as a warning.
    pub recommended_fields: Vec<String>,
    /// Default output format.
    pub format: Option<OutputFormat>,
    /// Embed the shared base metadata descriptor into schemas without one.
    pub embed_base_metadata: bool,
    /// Data summary fields keyed by schema type.
    pub summary_fields: BTreeMap<String, Vec<SummaryField>>,
}

impl CliConfig {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Extraction options for documents of `schema_type`, with
    /// `extra_recommended` appended to the configured recommended fields.
    pub fn extract_options(
        &self,
        extra_recommended: &[String],
        schema_type: Option<&str>,
    ) -> ExtractOptions {
        let mut recommended_fields = self.recommended_fields.clone();
        for field in extra_recommended {
            if !recommended_fields.contains(field) {
                recommended_fields.push(field.clone());
            }
        }
        let defaults = ExtractOptions::default();
        ExtractOptions {
            id_fields: self.id_fields.clone().unwrap_or(defaults.id_fields),
            summary_fields: schema_type
                .map(|t| self.summary_fields_for(t))
                .unwrap_or_default(),
            validation: ValidationOptions { recommended_fields },
        }
    }

    /// Summary fields for `schema_type`: the configured list, else the
    /// built-in one, else none.
    pub fn summary_fields_for(&self, schema_type: &str) -> Vec<SummaryField> {
        self.summary_fields
            .get(schema_type)
            .cloned()
            .or_else(|| default_summary_table().remove(schema_type))
            .unwrap_or_default()
    }

    /// The output format: the flag if given, else the configured format,
    /// else JSON.
    pub fn output_format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.format).unwrap_or_default()
    }
}
