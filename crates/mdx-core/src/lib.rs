//! # mdx-core: Foundational Types for the Metadata Extractor
//!
//! Defines the primitives every other crate in the workspace builds on.
//! Depends on nothing internal.
//!
//! ## Contents
//!
//! - [`ValueKind`]: the seven JSON Schema type names and the runtime
//!   classification of a parsed value into one of them.
//! - [`DataDocument`]: a parsed data instance: a top-level mapping with
//!   accessors for the embedded `metadata` block and identifier lookup.
//! - [`DocumentRole`] and [`Format`]: which document is being loaded and
//!   which structured-text syntax it uses.
//! - [`LoadError`]: the fatal error taxonomy for loading documents.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mdx-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod document;
pub mod error;
pub mod kind;
pub mod role;

pub use document::{DataDocument, DEFAULT_ID_FIELDS, METADATA_FIELD};
pub use error::LoadError;
pub use kind::{UnknownKind, ValueKind};
pub use role::{DocumentRole, Format};
