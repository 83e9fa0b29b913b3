//! # Base Metadata Descriptor
//!
//! Patient, medical-record, and clinical-study schemas all carry the same
//! administrative block under `metadata`. Rather than each schema restating
//! it, one descriptor is built here and embedded by value into any schema
//! that lacks its own (see [`SchemaDocument::with_base_metadata`]).
//!
//! The block groups what the documentation calls system metadata
//! (`createdAt`, `lastUpdated`, `createdBy`, `version`) and contextual
//! metadata (`status`, `tags`). Only `status` and `version` are required
//! inside the block; during validation their absence is a warning.
//!
//! [`SchemaDocument::with_base_metadata`]: crate::schema::SchemaDocument::with_base_metadata

use mdx_core::ValueKind;
use serde_json::Value;

use crate::schema::{Property, PropertyDescriptor};

/// Lifecycle states a record's `metadata.status` may take.
pub const METADATA_STATUSES: [&str; 5] = ["active", "inactive", "archived", "draft", "deleted"];

/// The shared descriptor for the `metadata` property.
pub fn base_metadata_descriptor() -> PropertyDescriptor {
    let status = PropertyDescriptor {
        allowed: Some(
            METADATA_STATUSES
                .iter()
                .map(|s| Value::String((*s).to_string()))
                .collect(),
        ),
        ..PropertyDescriptor::of_kind(ValueKind::String)
    };
    let timestamp = PropertyDescriptor {
        format: Some("date-time".to_string()),
        ..PropertyDescriptor::of_kind(ValueKind::String)
    };

    PropertyDescriptor {
        properties: vec![
            Property::new("status", status),
            Property::new("version", PropertyDescriptor::of_kind(ValueKind::String)),
            Property::new("createdAt", timestamp.clone()),
            Property::new("lastUpdated", timestamp),
            Property::new("createdBy", PropertyDescriptor::of_kind(ValueKind::String)),
            Property::new("tags", PropertyDescriptor::of_kind(ValueKind::Array)),
        ],
        required: vec!["status".to_string(), "version".to_string()],
        ..PropertyDescriptor::of_kind(ValueKind::Object)
    }
}
