//! # Schema Documents
//!
//! A [`SchemaDocument`] is the typed form of a parsed schema:
//!
//! ```text
//! {title, $id?, description?, required: [name], properties: {name: descriptor}}
//! ```
//!
//! where a descriptor is `{type?, format?, enum?, pattern?}` plus, for
//! object-typed properties, nested `properties` and `required`.
//!
//! Conversion from a generic value is strict about shape (a schema without
//! a `properties` mapping, an unknown `type` name, or an uncompilable
//! `pattern` are [`LoadError::SchemaShape`]) and lenient about
//! consistency: a required name missing from `properties` is a warning
//! reported through [`SchemaDocument::shape_warnings`], not a failure.
//!
//! Property order is the declared order of the source document.

use std::fmt;

use mdx_core::{LoadError, ValueKind, METADATA_FIELD};
use fancy_regex::Regex;
use serde_json::{Map, Value};

/// A compiled `pattern` constraint.
///
/// Patterns follow the JSON Schema (ECMA-262) dialect: look-around and
/// back-references are supported, and the shorthand classes `\d` and `\w`
/// are ASCII-only. Matching is unanchored: the value conforms if the
/// expression matches anywhere in it.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern.
    pub fn new(source: &str) -> Result<Self, fancy_regex::Error> {
        Ok(Self {
            source: source.to_string(),
            regex: Regex::new(&ecma_classes(source))?,
        })
    }

    /// The pattern text as declared in the schema.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `text` satisfies the pattern.
    ///
    /// A match that exceeds the backtracking limit counts as a mismatch.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text).unwrap_or_else(|e| {
            tracing::warn!(pattern = %self.source, "pattern match aborted: {e}");
            false
        })
    }
}

/// Rewrite ECMA-262 shorthand classes into explicit ASCII classes.
///
/// Outside a bracket class `\d` becomes `[0-9]`; inside one it becomes the
/// bare range `0-9`, and the negated forms become nested negated classes.
/// An unescaped `[` inside a class is a literal in ECMA-262 and is escaped.
fn ecma_classes(source: &str) -> String {
    const DIGIT: &str = "0-9";
    const WORD: &str = "A-Za-z0-9_";

    let mut out = String::with_capacity(source.len());
    let mut in_class = false;
    let mut chars = source.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(class @ ('d' | 'D' | 'w' | 'W')) => {
                    let range = if class.eq_ignore_ascii_case(&'d') { DIGIT } else { WORD };
                    let negated = class.is_ascii_uppercase();
                    match (in_class, negated) {
                        (true, false) => out.push_str(range),
                        (_, true) => {
                            out.push_str("[^");
                            out.push_str(range);
                            out.push(']');
                        }
                        (false, false) => {
                            out.push('[');
                            out.push_str(range);
                            out.push(']');
                        }
                    }
                }
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '[' if in_class => out.push_str("\\["),
            '[' => {
                in_class = true;
                out.push('[');
                // A leading `^` negates the class.
                let rest = chars.as_str();
                if let Some(stripped) = rest.strip_prefix('^') {
                    out.push('^');
                    chars = stripped.chars();
                }
            }
            ']' if in_class => {
                in_class = false;
                out.push(']');
            }
            other => out.push(other),
        }
    }
    out
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

/// Constraints declared for one property.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDescriptor {
    /// Accepted kinds. Empty means any kind is accepted.
    pub types: Vec<ValueKind>,
    /// Informational `format` hint (`date`, `date-time`, `email`, ...).
    pub format: Option<String>,
    /// Allowed values, if the property declares `enum`.
    pub allowed: Option<Vec<Value>>,
    /// Pattern a string value must match.
    pub pattern: Option<Pattern>,
    /// Nested properties of an object-typed property.
    pub properties: Vec<Property>,
    /// Nested required names of an object-typed property.
    pub required: Vec<String>,
}

impl PropertyDescriptor {
    /// A descriptor accepting exactly one kind.
    pub fn of_kind(kind: ValueKind) -> Self {
        Self {
            types: vec![kind],
            ..Self::default()
        }
    }

    /// Whether `value` conforms to the declared `type`.
    pub fn accepts_kind(&self, value: &Value) -> bool {
        self.types.is_empty() || self.types.iter().any(|k| k.accepts(value))
    }

    /// Declared type names joined with `|`, as used in mismatch messages.
    pub fn expected_type(&self) -> String {
        self.types
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Whether `value` is a member of the declared `enum`. Always true
    /// when no `enum` is declared.
    pub fn allows(&self, value: &Value) -> bool {
        self.allowed
            .as_ref()
            .map_or(true, |allowed| allowed.contains(value))
    }

    fn from_value(name: &str, value: &Value) -> Result<Self, LoadError> {
        let obj = value.as_object().ok_or_else(|| {
            LoadError::schema_shape(format!("descriptor for property '{name}' is not a mapping"))
        })?;

        let types = match obj.get("type") {
            None => Vec::new(),
            Some(Value::String(s)) => vec![s.parse::<ValueKind>()?],
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .ok_or_else(|| {
                            LoadError::schema_shape(format!(
                                "type list of property '{name}' contains a non-string entry"
                            ))
                        })
                        .and_then(|s| s.parse::<ValueKind>().map_err(LoadError::from))
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(LoadError::schema_shape(format!(
                    "type of property '{name}' must be a string or array, got {}",
                    ValueKind::of(other)
                )))
            }
        };

        let format = obj.get("format").and_then(Value::as_str).map(str::to_string);

        let allowed = match obj.get("enum") {
            None => None,
            Some(Value::Array(items)) => Some(items.clone()),
            Some(_) => {
                return Err(LoadError::schema_shape(format!(
                    "enum of property '{name}' must be an array"
                )))
            }
        };

        let pattern = match obj.get("pattern") {
            None => None,
            Some(Value::String(src)) => Some(Pattern::new(src).map_err(|e| {
                LoadError::schema_shape(format!("pattern of property '{name}' is invalid: {e}"))
            })?),
            Some(_) => {
                return Err(LoadError::schema_shape(format!(
                    "pattern of property '{name}' must be a string"
                )))
            }
        };

        let properties = match obj.get("properties") {
            None => Vec::new(),
            Some(Value::Object(map)) => parse_properties(map)?,
            Some(_) => {
                return Err(LoadError::schema_shape(format!(
                    "nested properties of '{name}' must be a mapping"
                )))
            }
        };

        let (required, _) = parse_required(obj.get("required"), name)?;

        Ok(Self {
            types,
            format,
            allowed,
            pattern,
            properties,
            required,
        })
    }
}

/// A named property descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub descriptor: PropertyDescriptor,
}

impl Property {
    pub fn new(name: impl Into<String>, descriptor: PropertyDescriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
        }
    }
}

/// A parsed schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    title: String,
    schema_id: Option<String>,
    description: Option<String>,
    required: Vec<String>,
    duplicate_required: Vec<String>,
    properties: Vec<Property>,
}

impl SchemaDocument {
    /// Build a schema from its parts. Duplicate required names are dropped
    /// after their first occurrence and reported as shape warnings.
    pub fn new(title: impl Into<String>, required: Vec<String>, properties: Vec<Property>) -> Self {
        let (required, duplicate_required) = dedup(required);
        Self {
            title: title.into(),
            schema_id: None,
            description: None,
            required,
            duplicate_required,
            properties,
        }
    }

    /// Convert a parsed schema value into its typed form.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::SchemaShape`] if the value is not a mapping,
    /// lacks a `properties` mapping, or contains a malformed descriptor.
    pub fn from_value(value: &Value) -> Result<Self, LoadError> {
        let obj = value.as_object().ok_or_else(|| {
            LoadError::schema_shape(format!(
                "top-level schema must be a mapping, got {}",
                ValueKind::of(value)
            ))
        })?;

        let properties = match obj.get("properties") {
            Some(Value::Object(map)) => parse_properties(map)?,
            Some(other) => {
                return Err(LoadError::schema_shape(format!(
                    "'properties' must be a mapping, got {}",
                    ValueKind::of(other)
                )))
            }
            None => return Err(LoadError::schema_shape("schema has no 'properties' mapping")),
        };

        let (required, duplicate_required) = parse_required(obj.get("required"), "(root)")?;

        Ok(Self {
            title: string_field(obj, "title").unwrap_or_default(),
            schema_id: string_field(obj, "$id"),
            description: string_field(obj, "description"),
            required,
            duplicate_required,
            properties,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The schema's `$id`, if declared.
    pub fn schema_id(&self) -> Option<&str> {
        self.schema_id.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Required field names in declared order, without duplicates.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Properties in declared order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Look up a property descriptor by name.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.descriptor)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Names of declared properties that are not required, in declared order.
    pub fn optional_properties(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .map(|p| p.name.as_str())
            .filter(move |name| !self.is_required(name))
    }

    /// Non-fatal inconsistencies in the schema itself.
    pub fn shape_warnings(&self) -> Vec<String> {
        let undeclared = self
            .required
            .iter()
            .filter(|name| self.property(name).is_none())
            .map(|name| format!("Required field {name} is not declared in properties"));
        let duplicates = self
            .duplicate_required
            .iter()
            .map(|name| format!("Duplicate required field: {name}"));
        undeclared.chain(duplicates).collect()
    }

    /// Embed `descriptor` as the `metadata` property unless the schema
    /// already declares one.
    pub fn with_metadata_descriptor(mut self, descriptor: PropertyDescriptor) -> Self {
        if self.property(METADATA_FIELD).is_none() {
            self.properties.push(Property::new(METADATA_FIELD, descriptor));
        }
        self
    }

    /// Embed the shared base metadata descriptor.
    ///
    /// See [`crate::metadata::base_metadata_descriptor`].
    pub fn with_base_metadata(self) -> Self {
        self.with_metadata_descriptor(crate::metadata::base_metadata_descriptor())
    }
}

fn parse_properties(map: &Map<String, Value>) -> Result<Vec<Property>, LoadError> {
    map.iter()
        .map(|(name, value)| {
            PropertyDescriptor::from_value(name, value).map(|d| Property::new(name.clone(), d))
        })
        .collect()
}

/// Parse a `required` array, returning the deduplicated names and the
/// duplicates that were dropped.
fn parse_required(value: Option<&Value>, owner: &str) -> Result<(Vec<String>, Vec<String>), LoadError> {
    let Some(value) = value else {
        return Ok((Vec::new(), Vec::new()));
    };
    let items = value.as_array().ok_or_else(|| {
        LoadError::schema_shape(format!("'required' of {owner} must be an array of strings"))
    })?;
    let names = items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                LoadError::schema_shape(format!(
                    "'required' of {owner} contains a non-string entry"
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(dedup(names))
}

fn dedup(names: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut kept: Vec<String> = Vec::with_capacity(names.len());
    let mut dropped = Vec::new();
    for name in names {
        if kept.contains(&name) {
            dropped.push(name);
        } else {
            kept.push(name);
        }
    }
    (kept, dropped)
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patient_schema() -> Value {
        json!({
            "$id": "https://schemas.example.org/patient.json",
            "title": "Patient Record",
            "description": "Demographic record for a single patient.",
            "required": ["patientId", "personalInfo"],
            "properties": {
                "patientId": {"type": "string", "pattern": "^P-[0-9]+$"},
                "personalInfo": {"type": "object"},
                "bloodType": {"type": "string", "enum": ["A+", "A-", "B+", "B-", "O+", "O-", "AB+", "AB-"]},
                "allergies": {"type": "array"},
                "weightKg": {"type": ["number", "null"]}
            }
        })
    }

    #[test]
    fn parse_full_schema() {
        let schema = SchemaDocument::from_value(&patient_schema()).unwrap();
        assert_eq!(schema.title(), "Patient Record");
        assert_eq!(schema.schema_id(), Some("https://schemas.example.org/patient.json"));
        assert!(schema.description().unwrap().contains("patient"));
        assert_eq!(schema.required(), ["patientId", "personalInfo"]);
        assert_eq!(schema.properties().len(), 5);
    }

    #[test]
    fn properties_keep_declared_order() {
        let schema = SchemaDocument::from_value(&patient_schema()).unwrap();
        let names: Vec<&str> = schema.properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["patientId", "personalInfo", "bloodType", "allergies", "weightKg"]);
    }

    #[test]
    fn optional_properties_exclude_required() {
        let schema = SchemaDocument::from_value(&patient_schema()).unwrap();
        let optional: Vec<&str> = schema.optional_properties().collect();
        assert_eq!(optional, vec!["bloodType", "allergies", "weightKg"]);
    }

    #[test]
    fn type_union_is_parsed() {
        let schema = SchemaDocument::from_value(&patient_schema()).unwrap();
        let weight = schema.property("weightKg").unwrap();
        assert_eq!(weight.types, vec![ValueKind::Number, ValueKind::Null]);
        assert_eq!(weight.expected_type(), "number|null");
        assert!(weight.accepts_kind(&json!(null)));
        assert!(weight.accepts_kind(&json!(71.5)));
        assert!(!weight.accepts_kind(&json!("71.5")));
    }

    #[test]
    fn missing_type_accepts_anything() {
        let d = PropertyDescriptor::default();
        assert!(d.accepts_kind(&json!({"a": 1})));
        assert!(d.accepts_kind(&json!(null)));
    }

    #[test]
    fn enum_membership() {
        let schema = SchemaDocument::from_value(&patient_schema()).unwrap();
        let blood = schema.property("bloodType").unwrap();
        assert!(blood.allows(&json!("AB-")));
        assert!(!blood.allows(&json!("Z+")));
        assert!(PropertyDescriptor::default().allows(&json!("anything")));
    }

    #[test]
    fn pattern_is_compiled() {
        let schema = SchemaDocument::from_value(&patient_schema()).unwrap();
        let pattern = schema.property("patientId").unwrap().pattern.as_ref().unwrap();
        assert_eq!(pattern.as_str(), "^P-[0-9]+$");
        assert!(pattern.is_match("P-1001"));
        assert!(!pattern.is_match("1001"));
    }

    #[test]
    fn missing_properties_is_shape_error() {
        let err = SchemaDocument::from_value(&json!({"title": "Empty", "required": []})).unwrap_err();
        assert!(matches!(err, LoadError::SchemaShape { .. }), "got: {err}");
    }

    #[test]
    fn non_mapping_properties_is_shape_error() {
        let err = SchemaDocument::from_value(&json!({"properties": ["a", "b"]})).unwrap_err();
        assert!(err.to_string().contains("'properties' must be a mapping"));
    }

    #[test]
    fn non_mapping_schema_is_shape_error() {
        let err = SchemaDocument::from_value(&json!("schema")).unwrap_err();
        assert!(matches!(err, LoadError::SchemaShape { .. }));
    }

    #[test]
    fn unknown_type_is_shape_error() {
        let err = SchemaDocument::from_value(&json!({
            "properties": {"dob": {"type": "date"}}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("date"), "got: {err}");
    }

    #[test]
    fn invalid_pattern_is_shape_error() {
        let err = SchemaDocument::from_value(&json!({
            "properties": {"code": {"type": "string", "pattern": "([a-z"}}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("pattern of property 'code'"), "got: {err}");
    }

    #[test]
    fn look_ahead_pattern_compiles() {
        let pattern = Pattern::new("^(?!TEST-)[A-Z]+-[0-9]+$").unwrap();
        assert!(pattern.is_match("PAT-123"));
        assert!(!pattern.is_match("TEST-123"));
    }

    #[test]
    fn shorthand_classes_are_ascii() {
        let digits = Pattern::new(r"^PAT-\d{3}$").unwrap();
        assert_eq!(digits.as_str(), r"^PAT-\d{3}$");
        assert!(digits.is_match("PAT-123"));
        assert!(!digits.is_match("PAT-\u{661}\u{662}\u{663}"));

        let word = Pattern::new(r"^\w+$").unwrap();
        assert!(word.is_match("abc_1"));
        assert!(!word.is_match("caf\u{e9}"));
    }

    #[test]
    fn shorthand_classes_inside_brackets() {
        assert_eq!(ecma_classes(r"[\d-]"), "[0-9-]");
        assert_eq!(ecma_classes(r"[a\D]"), "[a[^0-9]]");
        assert_eq!(ecma_classes(r"\W"), "[^A-Za-z0-9_]");
        assert_eq!(ecma_classes(r"[^[\]]"), r"[^\[\]]");
        assert_eq!(ecma_classes(r"\\d"), r"\\d");

        let code = Pattern::new(r"^[\d-]+$").unwrap();
        assert!(code.is_match("2024-01"));
        assert!(!code.is_match("2024/01"));
    }

    #[test]
    fn required_must_be_strings() {
        let err = SchemaDocument::from_value(&json!({
            "required": ["a", 7],
            "properties": {"a": {}}
        }))
        .unwrap_err();
        assert!(matches!(err, LoadError::SchemaShape { .. }));
    }

    #[test]
    fn missing_title_is_empty() {
        let schema = SchemaDocument::from_value(&json!({"properties": {}})).unwrap();
        assert_eq!(schema.title(), "");
        assert!(schema.required().is_empty());
    }

    #[test]
    fn undeclared_required_is_warning() {
        let schema = SchemaDocument::from_value(&json!({
            "required": ["patientId", "ghost"],
            "properties": {"patientId": {"type": "string"}}
        }))
        .unwrap();
        assert_eq!(
            schema.shape_warnings(),
            vec!["Required field ghost is not declared in properties".to_string()]
        );
    }

    #[test]
    fn duplicate_required_is_dropped_and_warned() {
        let schema = SchemaDocument::from_value(&json!({
            "required": ["a", "b", "a"],
            "properties": {"a": {}, "b": {}}
        }))
        .unwrap();
        assert_eq!(schema.required(), ["a", "b"]);
        assert_eq!(schema.shape_warnings(), vec!["Duplicate required field: a".to_string()]);
    }

    #[test]
    fn nested_object_descriptor() {
        let schema = SchemaDocument::from_value(&json!({
            "properties": {
                "metadata": {
                    "type": "object",
                    "required": ["status"],
                    "properties": {"status": {"type": "string"}}
                }
            }
        }))
        .unwrap();
        let metadata = schema.property("metadata").unwrap();
        assert_eq!(metadata.required, vec!["status".to_string()]);
        assert_eq!(metadata.properties[0].name, "status");
    }

    #[test]
    fn base_metadata_embedded_only_when_absent() {
        let schema = SchemaDocument::new("T", vec![], vec![]).with_base_metadata();
        assert!(schema.property("metadata").is_some());

        let custom = PropertyDescriptor::of_kind(ValueKind::Object);
        let schema = SchemaDocument::new(
            "T",
            vec![],
            vec![Property::new("metadata", custom.clone())],
        )
        .with_base_metadata();
        assert_eq!(schema.property("metadata"), Some(&custom));
        assert_eq!(schema.properties().len(), 1);
    }
}
