//! # Conformance Validation
//!
//! Checks one [`DataDocument`] against one [`SchemaDocument`] in a single
//! deterministic pass. Problems are collected, never raised, so a caller
//! always sees every problem at once.
//!
//! ## Order of checks
//!
//! 1. Schema shape warnings (required names not declared, duplicates).
//! 2. Each required name absent from the data, in declared order, is an
//!    error.
//! 3. Each declared property present in the data, in declared order:
//!    - a kind outside the declared `type` is an error;
//!    - a value outside the declared `enum` is a warning;
//!    - a string not matching the declared `pattern` is an error;
//!    - for object-typed properties, each nested required name absent from
//!      the nested mapping is a "recommended" warning.
//! 4. Each configured recommended top-level field absent from the data is
//!    a warning.
//!
//! `valid` is exactly `errors.is_empty()`; warnings never affect it.

use mdx_core::{DataDocument, ValueKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{PropertyDescriptor, SchemaDocument};

/// Outcome of validating one data document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff `errors` is empty.
    pub valid: bool,
    /// Required-field violations, type mismatches, and pattern failures.
    pub errors: Vec<String>,
    /// Non-fatal issues.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Tunables for [`Validator`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Top-level fields whose absence is reported as a warning.
    #[serde(default)]
    pub recommended_fields: Vec<String>,
}

/// Validator carrying [`ValidationOptions`].
///
/// Stateless between calls; one instance may validate any number of
/// documents, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: ValidationOptions,
}

impl Validator {
    pub fn new(options: ValidationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate `data` against `schema`.
    pub fn validate(&self, schema: &SchemaDocument, data: &DataDocument) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = schema.shape_warnings();

        for name in schema.required() {
            if !data.contains(name) {
                errors.push(format!("Missing required field: {name}"));
            }
        }

        for property in schema.properties() {
            if let Some(value) = data.get(&property.name) {
                check_property(&property.name, &property.descriptor, value, &mut errors, &mut warnings);
            }
        }

        for name in &self.options.recommended_fields {
            if !data.contains(name) {
                warnings.push(format!("Missing recommended field: {name}"));
            }
        }

        let result = ValidationResult::from_findings(errors, warnings);
        tracing::debug!(
            schema = schema.title(),
            valid = result.valid,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "validated document"
        );
        result
    }
}

/// Validate `data` against `schema` with default options.
pub fn validate(schema: &SchemaDocument, data: &DataDocument) -> ValidationResult {
    Validator::default().validate(schema, data)
}

fn check_property(
    name: &str,
    descriptor: &PropertyDescriptor,
    value: &Value,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    if !descriptor.accepts_kind(value) {
        errors.push(format!(
            "Type mismatch for field {name}: expected {}, got {}",
            descriptor.expected_type(),
            ValueKind::of(value)
        ));
    }

    if !descriptor.allows(value) {
        warnings.push(format!("Value for {name} not in allowed set"));
    }

    if let (Some(pattern), Value::String(text)) = (&descriptor.pattern, value) {
        if !pattern.is_match(text) {
            errors.push(format!("Field {name} does not match required pattern"));
        }
    }

    if let Value::Object(nested) = value {
        for field in &descriptor.required {
            if !nested.contains_key(field) {
                warnings.push(format!("Missing recommended field: {name}.{field}"));
            }
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i32>().prop_map(|n| json!(n)),
            (-1000i32..1000).prop_map(|n| json!(f64::from(n) + 0.25)),
            "[A-Z][a-z]{0,6}".prop_map(Value::String),
            Just(json!([1, 2])),
            Just(json!({"k": "v"})),
        ]
    }

    fn schema_strategy() -> impl Strategy<Value = SchemaDocument> {
        let kinds = prop::sample::select(vec![
            "string", "number", "integer", "boolean", "object", "array", "null",
        ]);
        (
            prop::collection::btree_map("[a-f]", kinds, 0..6),
            prop::collection::vec("[a-h]", 0..5),
        )
            .prop_map(|(props, required)| {
                let properties: serde_json::Map<String, Value> = props
                    .into_iter()
                    .map(|(name, kind)| (name, json!({"type": kind, "enum": ["A", 1]})))
                    .collect();
                SchemaDocument::from_value(&json!({
                    "title": "generated",
                    "required": required,
                    "properties": properties,
                }))
                .unwrap()
            })
    }

    fn data_strategy() -> impl Strategy<Value = DataDocument> {
        prop::collection::btree_map("[a-h]", scalar(), 0..8)
            .prop_map(|m| DataDocument::new(m.into_iter().collect()))
    }

    proptest! {
        /// `valid` is false exactly when there is at least one error.
        #[test]
        fn valid_iff_no_errors(s in schema_strategy(), d in data_strategy()) {
            let result = validate(&s, &d);
            prop_assert_eq!(result.valid, result.errors.is_empty());
        }

        /// Validating the same pair twice yields identical findings.
        #[test]
        fn validation_is_deterministic(s in schema_strategy(), d in data_strategy()) {
            prop_assert_eq!(validate(&s, &d), validate(&s, &d));
        }

        /// Warnings alone never make a document invalid.
        #[test]
        fn recommended_fields_never_affect_validity(
            s in schema_strategy(),
            d in data_strategy(),
            recommended in prop::collection::vec("[a-z]{1,4}", 0..4),
        ) {
            let plain = validate(&s, &d);
            let tuned = Validator::new(ValidationOptions { recommended_fields: recommended })
                .validate(&s, &d);
            prop_assert_eq!(plain.valid, tuned.valid);
            prop_assert_eq!(plain.errors, tuned.errors);
        }
    }
}
