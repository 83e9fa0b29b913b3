//! # mdx-cli: Metadata Extractor Command-Line Interface
//!
//! Provides the `mdx` command-line interface over `mdx-schema`.
//!
//! ## Subcommands
//!
//! - `mdx check SCHEMA DATA`: check one data document and print its report.
//! - `mdx batch SCHEMA_DIR DATA_DIR`: check every `<stem>_schema` /
//!   `<stem>_example` pair in two directories.
//!
//! ## Exit Codes
//!
//! - `0`: every checked document is valid.
//! - `1`: at least one document is invalid or could not be loaded in a batch.
//! - `2`: operational error: bad arguments, unreadable config, or (for
//!   `check`) a document that failed to load.
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handler functions delegate to `mdx-schema`; reports go to stdout,
//!   logs go to stderr.

pub mod batch;
pub mod check;
pub mod config;

/// Exit code for a run in which every document is valid.
pub const EXIT_VALID: u8 = 0;
/// Exit code for a run with at least one failing document.
pub const EXIT_INVALID: u8 = 1;
/// Exit code for an operational error.
pub const EXIT_ERROR: u8 = 2;

/// Map a validation verdict to an exit code.
pub fn exit_code(valid: bool) -> u8 {
    if valid {
        EXIT_VALID
    } else {
        EXIT_INVALID
    }
}

/// The line printed to stderr when a command fails: the full context chain.
pub fn error_line(error: &anyhow::Error) -> String {
    format!("error: {error:#}")
}
