//! # Batch Subcommand
//!
//! Checks every schema in a directory against its matching data document.
//!
//! A schema file `<stem>_schema.{json,yaml,yml}` is paired with
//! `<stem>_example.{json,yaml,yml}` in the data directory. Pairs are
//! processed in lexical order of their stems, each independently; a pair
//! that fails to load is recorded and the batch continues.
//!
//! Exit code: 0 when every pair loaded and validated, 1 otherwise.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use mdx_core::LoadError;
use mdx_schema::{load_data, render, render_batch, BatchSummary, Extractor, OutputFormat, ReportHeader, Source};

use crate::check::{load_schema_file, print_output};
use crate::config::CliConfig;

const SCHEMA_SUFFIX: &str = "_schema";
const DATA_SUFFIX: &str = "_example";
const EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Arguments for the `mdx batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory containing `<stem>_schema.json` files.
    #[arg(value_name = "SCHEMA_DIR")]
    pub schema_dir: PathBuf,

    /// Directory containing `<stem>_example.json` files.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Output format: json, yaml, or text.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Embed the shared base metadata descriptor into schemas without one.
    #[arg(long)]
    pub embed_base_metadata: bool,
}

/// A schema file and the data file it is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPair {
    pub stem: String,
    pub schema: PathBuf,
    pub data: PathBuf,
}

/// Execute the batch subcommand.
pub fn run_batch(args: &BatchArgs, config: &CliConfig) -> Result<u8> {
    let pairs = discover_pairs(&args.schema_dir, &args.data_dir)?;
    if pairs.is_empty() {
        tracing::warn!(dir = %args.schema_dir.display(), "no *_schema files found");
    }

    let format = config.output_format(args.format);
    let embed = args.embed_base_metadata || config.embed_base_metadata;
    let mut summary = BatchSummary::new();

    for pair in &pairs {
        let schema = match load_schema_file(&pair.schema, embed) {
            Ok(schema) => schema,
            Err(e) => {
                record_failure(&mut summary, pair, &e);
                continue;
            }
        };
        let data = match load_data(Source::path(&pair.data)) {
            Ok(data) => data,
            Err(e) => {
                record_failure(&mut summary, pair, &e);
                continue;
            }
        };

        // The stem doubles as the schema type for the data summary.
        let extractor = Extractor::new(config.extract_options(&[], Some(&pair.stem)));
        let report = extractor.extract(&schema, &data);
        tracing::info!(
            stem = %pair.stem,
            valid = report.validation.valid,
            errors = report.validation.errors.len(),
            "checked document"
        );

        if format == OutputFormat::Text {
            let header =
                ReportHeader::for_schema(&schema, chrono::Utc::now()).with_schema_type(pair.stem.as_str());
            let text = render(&report, format, &header).context("failed to render report")?;
            println!("{text}");
        }
        summary.record_report(pair.stem.clone(), report);
    }

    let output = render_batch(&summary, format).context("failed to render batch summary")?;
    print_output(&output, format);

    Ok(crate::exit_code(summary.all_passed()))
}

fn record_failure(summary: &mut BatchSummary, pair: &DocumentPair, error: &LoadError) {
    tracing::warn!(stem = %pair.stem, "skipping pair: {error}");
    summary.record_load_error(pair.stem.clone(), error);
}

/// Pair every schema file in `schema_dir` with its data file in `data_dir`.
///
/// A schema without any matching data file is still paired, with the
/// `.json` path, so the missing file surfaces as a load failure.
pub fn discover_pairs(schema_dir: &Path, data_dir: &Path) -> Result<Vec<DocumentPair>> {
    let entries = std::fs::read_dir(schema_dir)
        .with_context(|| format!("cannot read schema directory: {}", schema_dir.display()))?;

    let mut pairs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(stem) = schema_stem(&path) else {
            continue;
        };
        let data = find_data_file(data_dir, &stem);
        pairs.push(DocumentPair {
            stem,
            schema: path,
            data,
        });
    }
    pairs.sort_by(|a, b| a.stem.cmp(&b.stem).then_with(|| a.schema.cmp(&b.schema)));
    Ok(pairs)
}

/// `patient_schema.json` → `patient`.
fn schema_stem(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if !EXTENSIONS.contains(&ext) {
        return None;
    }
    let name = path.file_stem()?.to_str()?;
    name.strip_suffix(SCHEMA_SUFFIX)
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

fn find_data_file(data_dir: &Path, stem: &str) -> PathBuf {
    EXTENSIONS
        .iter()
        .map(|ext| data_dir.join(format!("{stem}{DATA_SUFFIX}.{ext}")))
        .find(|candidate| candidate.is_file())
        .unwrap_or_else(|| data_dir.join(format!("{stem}{DATA_SUFFIX}.json")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    const SCHEMA: &str = r#"{"title": "T", "required": ["id"], "properties": {"id": {"type": "string"}}}"#;

    #[test]
    fn schema_stem_extraction() {
        assert_eq!(schema_stem(Path::new("a/patient_schema.json")), Some("patient".to_string()));
        assert_eq!(
            schema_stem(Path::new("medical_record_schema.yaml")),
            Some("medical_record".to_string())
        );
        assert_eq!(schema_stem(Path::new("patient.json")), None);
        assert_eq!(schema_stem(Path::new("_schema.json")), None);
        assert_eq!(schema_stem(Path::new("patient_schema.txt")), None);
    }

    #[test]
    fn discover_pairs_sorted_with_data_fallback() {
        let schemas = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();
        write(schemas.path(), "study_schema.json", SCHEMA);
        write(schemas.path(), "patient_schema.json", SCHEMA);
        write(schemas.path(), "README.md", "not a schema");
        write(data.path(), "patient_example.yaml", "id: P-1\n");

        let pairs = discover_pairs(schemas.path(), data.path()).unwrap();
        let stems: Vec<&str> = pairs.iter().map(|p| p.stem.as_str()).collect();
        assert_eq!(stems, vec!["patient", "study"]);
        assert_eq!(pairs[0].data, data.path().join("patient_example.yaml"));
        assert_eq!(pairs[1].data, data.path().join("study_example.json"));
    }

    #[test]
    fn missing_schema_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_pairs(&dir.path().join("absent"), dir.path()).unwrap_err();
        assert!(err.to_string().contains("cannot read schema directory"));
    }

    fn batch_args(schemas: &Path, data: &Path) -> BatchArgs {
        BatchArgs {
            schema_dir: schemas.to_path_buf(),
            data_dir: data.to_path_buf(),
            format: Some(OutputFormat::Json),
            embed_base_metadata: false,
        }
    }

    #[test]
    fn all_valid_batch_exits_zero() {
        let schemas = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();
        write(schemas.path(), "patient_schema.json", SCHEMA);
        write(data.path(), "patient_example.json", r#"{"id": "P-1"}"#);

        let code = run_batch(&batch_args(schemas.path(), data.path()), &CliConfig::default()).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn missing_data_file_fails_batch() {
        let schemas = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();
        write(schemas.path(), "patient_schema.json", SCHEMA);
        write(schemas.path(), "study_schema.json", SCHEMA);
        write(data.path(), "patient_example.json", r#"{"id": "P-1"}"#);

        let code = run_batch(&batch_args(schemas.path(), data.path()), &CliConfig::default()).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn invalid_document_fails_batch_in_text_mode() {
        let schemas = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();
        write(schemas.path(), "patient_schema.json", SCHEMA);
        write(data.path(), "patient_example.json", r#"{"name": "nobody"}"#);

        let mut args = batch_args(schemas.path(), data.path());
        args.format = Some(OutputFormat::Text);
        let code = run_batch(&args, &CliConfig::default()).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn repository_samples_pass() {
        let mut root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        root.pop(); // crates/
        root.pop(); // repo root
        let args = batch_args(&root.join("schemas"), &root.join("samples"));
        assert_eq!(run_batch(&args, &CliConfig::default()).unwrap(), 0);
    }
}
