//! # mdx-schema: Schema Conformance & Metadata Extraction
//!
//! Checks a data document against a schema and summarises its metadata.
//!
//! ## Pipeline
//!
//! 1. [`loader`]: [`load_schema`] and [`load_data`] read a [`Source`]
//!    (path, text, bytes, or parsed value) in JSON or YAML. Load failures
//!    are fatal and name the document that failed.
//! 2. [`validate`](mod@validate): [`validate()`](validate::validate) checks required
//!    fields, declared types, enums, and patterns, collecting every problem
//!    into a [`ValidationResult`].
//! 3. [`extract`]: [`extract_metadata`] builds a [`MetadataReport`]: the
//!    embedded `metadata` block, a best-effort id, field count, optional-field
//!    completeness, and a fresh validation. [`summary`] picks the labelled
//!    values of the optional data summary.
//! 4. [`render`]: JSON, YAML, or text output; [`batch`] aggregates many
//!    independently produced reports.
//!
//! Validation and extraction are pure and stateless: no I/O, no shared
//! state, safe to call from any number of threads on different inputs.
//!
//! ## Crate Policy
//!
//! - Depends only on `mdx-core` internally.
//! - Field-level problems are collected, never raised.

pub mod batch;
pub mod extract;
pub mod loader;
pub mod metadata;
pub mod render;
pub mod schema;
pub mod summary;
pub mod validate;

pub use batch::{BatchEntry, BatchOutcome, BatchSummary};
pub use extract::{completeness, extract_metadata, DerivedStats, ExtractOptions, Extractor, MetadataReport};
pub use loader::{load_data, load_schema, Source};
pub use metadata::base_metadata_descriptor;
pub use render::{render, render_batch, BatchText, OutputFormat, RenderError, ReportHeader, TextReport};
pub use schema::{Pattern, Property, PropertyDescriptor, SchemaDocument};
pub use summary::{default_summary_table, summarize, SummaryField};
pub use validate::{validate, ValidationOptions, ValidationResult, Validator};
