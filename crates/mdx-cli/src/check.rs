//! # Check Subcommand
//!
//! Checks one data document against one schema and prints the metadata
//! report to stdout.
//!
//! Exit code: 0 when the document is valid, 1 when it is not. Load failures
//! are returned as errors and print no report.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use mdx_core::LoadError;
use mdx_schema::{
    load_data, load_schema, render, Extractor, OutputFormat, ReportHeader, SchemaDocument, Source,
};

use crate::config::CliConfig;

/// Arguments for the `mdx check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the schema document (JSON or YAML).
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Path to the data document (JSON or YAML).
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Output format: json, yaml, or text.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Embed the shared base metadata descriptor if the schema has none.
    #[arg(long)]
    pub embed_base_metadata: bool,

    /// Warn when this top-level field is missing. Repeatable.
    #[arg(long = "recommend", value_name = "FIELD")]
    pub recommend: Vec<String>,

    /// Schema type selecting the data summary fields. Defaults to the
    /// schema file name without its `_schema` suffix.
    #[arg(long, value_name = "TYPE")]
    pub schema_type: Option<String>,
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs, config: &CliConfig) -> Result<u8> {
    let schema = load_schema_file(&args.schema, args.embed_base_metadata || config.embed_base_metadata)
        .with_context(|| format!("failed to load schema {}", args.schema.display()))?;
    let data = load_data(Source::path(&args.data))
        .with_context(|| format!("failed to load data {}", args.data.display()))?;

    let schema_type = args
        .schema_type
        .clone()
        .or_else(|| schema_type_of(&args.schema));
    let extractor = Extractor::new(config.extract_options(&args.recommend, schema_type.as_deref()));
    let report = extractor.extract(&schema, &data);

    tracing::info!(
        schema = %args.schema.display(),
        data = %args.data.display(),
        valid = report.validation.valid,
        errors = report.validation.errors.len(),
        warnings = report.validation.warnings.len(),
        "checked document"
    );

    let format = config.output_format(args.format);
    let mut header = ReportHeader::for_schema(&schema, chrono::Utc::now());
    if let Some(schema_type) = schema_type {
        header = header.with_schema_type(schema_type);
    }
    let output = render(&report, format, &header).context("failed to render report")?;
    print_output(&output, format);

    Ok(crate::exit_code(report.validation.valid))
}

/// `patient_schema.json` → `patient`; a name without the suffix is used whole.
pub(crate) fn schema_type_of(path: &Path) -> Option<String> {
    let name = path.file_stem()?.to_str()?;
    let stem = name.strip_suffix("_schema").unwrap_or(name);
    (!stem.is_empty()).then(|| stem.to_string())
}

/// Load a schema file, optionally embedding the base metadata descriptor.
pub(crate) fn load_schema_file(
    path: &Path,
    embed_base_metadata: bool,
) -> Result<SchemaDocument, LoadError> {
    let schema = load_schema(Source::path(path))?;
    Ok(if embed_base_metadata {
        schema.with_base_metadata()
    } else {
        schema
    })
}

/// Print rendered output, ensuring exactly one trailing newline.
pub(crate) fn print_output(output: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{output}"),
        OutputFormat::Yaml | OutputFormat::Text => print!("{output}"),
    }
}
