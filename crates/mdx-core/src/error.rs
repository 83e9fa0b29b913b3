//! # Error Types
//!
//! Loading is the only fallible step in the pipeline. Field-level problems
//! found by validation are collected into a result, never raised, so they
//! have no variant here.
//!
//! Every variant that concerns a specific document carries its
//! [`DocumentRole`] so callers can tell whether the schema or the data
//! failed.

use thiserror::Error;

use crate::role::{DocumentRole, Format};

/// Fatal error while loading a schema or data document.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source could not be read.
    #[error("{role} document could not be read from '{path}': {source}")]
    Io {
        /// Which document failed.
        role: DocumentRole,
        /// Path that was being read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The payload is not well-formed structured text, or its top level
    /// is not a mapping.
    #[error("{role} document is not well-formed {format}: {reason}")]
    Parse {
        /// Which document failed.
        role: DocumentRole,
        /// Syntax the payload was parsed as.
        format: Format,
        /// Parser message.
        reason: String,
    },

    /// The schema parsed but cannot be validated against, e.g. it lacks a
    /// `properties` mapping.
    #[error("schema shape error: {reason}")]
    SchemaShape {
        /// What is wrong with the schema.
        reason: String,
    },
}

impl LoadError {
    /// The document this error concerns.
    pub fn role(&self) -> DocumentRole {
        match self {
            LoadError::Io { role, .. } | LoadError::Parse { role, .. } => *role,
            LoadError::SchemaShape { .. } => DocumentRole::Schema,
        }
    }

    /// Build a [`LoadError::SchemaShape`].
    pub fn schema_shape(reason: impl Into<String>) -> Self {
        LoadError::SchemaShape {
            reason: reason.into(),
        }
    }

    /// Build a [`LoadError::Parse`].
    pub fn parse(role: DocumentRole, format: Format, reason: impl Into<String>) -> Self {
        LoadError::Parse {
            role,
            format,
            reason: reason.into(),
        }
    }
}

impl From<crate::kind::UnknownKind> for LoadError {
    fn from(e: crate::kind::UnknownKind) -> Self {
        LoadError::schema_shape(e.to_string())
    }
}
