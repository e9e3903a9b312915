//! Front-matter schemas and validation.
//!
//! A [`Schema`] maps field names to typed [`FieldSpec`]s. Validation collects
//! every issue in a document rather than stopping at the first one, so a
//! failing document can be fixed in a single pass.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result, ValidationIssue};

/// Primitive and compound field types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Boolean,
    Number,
    /// A date or datetime, normalized to ISO 8601 text.
    Date,
    Array(Box<FieldType>),
}

impl FieldType {
    /// Shorthand for `array<T>`.
    pub fn array_of(inner: FieldType) -> Self {
        Self::Array(Box::new(inner))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Boolean => f.write_str("boolean"),
            Self::Number => f.write_str("number"),
            Self::Date => f.write_str("date"),
            Self::Array(inner) => write!(f, "array<{inner}>"),
        }
    }
}

impl FromStr for FieldType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(inner) = s.strip_suffix("[]") {
            return Ok(Self::array_of(inner.parse()?));
        }
        if let Some(inner) = s.strip_prefix("array<").and_then(|r| r.strip_suffix('>')) {
            return Ok(Self::array_of(inner.parse()?));
        }
        match s {
            "string" => Ok(Self::String),
            "boolean" | "bool" => Ok(Self::Boolean),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            other => Err(CoreError::schema(format!("unknown field type '{other}'"))),
        }
    }
}

/// A field declaration: its type, whether it may be absent, and a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldSpec", into = "RawFieldSpec")]
pub struct FieldSpec {
    pub ty: FieldType,
    pub optional: bool,
    pub default: Option<Value>,
}

impl FieldSpec {
    /// A required field.
    pub fn required(ty: FieldType) -> Self {
        Self {
            ty,
            optional: false,
            default: None,
        }
    }

    /// An optional field without a default.
    pub fn optional(ty: FieldType) -> Self {
        Self {
            ty,
            optional: true,
            default: None,
        }
    }

    /// Set a default value; implies optional.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.optional = true;
        self.default = Some(value);
        self
    }
}

/// Serialized form of a field spec.
///
/// Accepts the shorthand `"string"`, `"string?"` (optional) or `"string[]"`,
/// or a table `{ type = "array", items = "string", optional = true, default = [] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawFieldSpec {
    Short(String),
    Full {
        #[serde(rename = "type")]
        ty: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        items: Option<String>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        optional: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<Value>,
    },
}

impl TryFrom<RawFieldSpec> for FieldSpec {
    type Error = CoreError;

    fn try_from(raw: RawFieldSpec) -> Result<Self> {
        match raw {
            RawFieldSpec::Short(s) => match s.trim().strip_suffix('?') {
                Some(ty) => Ok(Self::optional(ty.parse()?)),
                None => Ok(Self::required(s.parse()?)),
            },
            RawFieldSpec::Full {
                ty,
                items,
                optional,
                default,
            } => {
                let ty = match (ty.trim(), items) {
                    ("array", Some(items)) => FieldType::array_of(items.parse()?),
                    ("array", None) => {
                        return Err(CoreError::schema("array field needs an 'items' type"));
                    }
                    (other, _) => other.parse()?,
                };
                let mut spec = Self {
                    ty,
                    optional,
                    default: None,
                };
                if let Some(value) = default {
                    spec = spec.with_default(value);
                }
                Ok(spec)
            }
        }
    }
}

impl From<FieldSpec> for RawFieldSpec {
    fn from(spec: FieldSpec) -> Self {
        let (ty, items) = match spec.ty {
            FieldType::Array(inner) => ("array".to_string(), Some(inner.to_string())),
            other => (other.to_string(), None),
        };
        Self::Full {
            ty,
            items,
            optional: spec.optional,
            default: spec.default,
        }
    }
}

/// What to do with front-matter keys the schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeys {
    /// Drop them from the validated data.
    #[default]
    Strip,
    /// Keep them untouched.
    Passthrough,
    /// Report each one as a validation issue.
    Strict,
}

/// A named set of typed fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldSpec>,

    #[serde(default)]
    pub unknown_keys: UnknownKeys,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required field.
    #[must_use]
    pub fn field(self, name: impl Into<String>, ty: FieldType) -> Self {
        self.with(name, FieldSpec::required(ty))
    }

    /// Add a field with an explicit spec.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    #[must_use]
    pub fn unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.unknown_keys = policy;
        self
    }

    /// Names of fields that must be present.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, spec)| !spec.optional)
            .map(|(name, _)| name.as_str())
    }

    /// Check that the schema itself is usable.
    pub fn check_definition(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(CoreError::schema("schema declares no fields"));
        }
        for (name, spec) in &self.fields {
            if name.trim().is_empty() {
                return Err(CoreError::schema("field names cannot be empty"));
            }
            if let Some(default) = &spec.default {
                let mut issues = Vec::new();
                check_value(&spec.ty, default, name, &mut issues);
                if let Some(issue) = issues.first() {
                    return Err(CoreError::schema(format!("invalid default for {issue}")));
                }
            }
        }
        Ok(())
    }

    /// Validate raw front matter.
    ///
    /// Returns the normalized data on success, or every issue found.
    pub fn validate(
        &self,
        data: &Map<String, Value>,
    ) -> std::result::Result<Map<String, Value>, Vec<ValidationIssue>> {
        let mut issues = Vec::new();
        let mut output = Map::new();

        for (name, spec) in &self.fields {
            match data.get(name) {
                Some(value) => {
                    if let Some(normalized) = check_value(&spec.ty, value, name, &mut issues) {
                        output.insert(name.clone(), normalized);
                    }
                }
                None => match (&spec.default, spec.optional) {
                    (Some(default), _) => {
                        output.insert(name.clone(), default.clone());
                    }
                    (None, true) => {}
                    (None, false) => {
                        issues.push(ValidationIssue::missing(name, spec.ty.to_string()));
                    }
                },
            }
        }

        for (key, value) in data {
            if self.fields.contains_key(key) {
                continue;
            }
            match self.unknown_keys {
                UnknownKeys::Strip => {}
                UnknownKeys::Passthrough => {
                    output.insert(key.clone(), value.clone());
                }
                UnknownKeys::Strict => issues.push(ValidationIssue::unknown_key(key)),
            }
        }

        if issues.is_empty() {
            Ok(output)
        } else {
            Err(issues)
        }
    }
}

/// Check one value, pushing issues and returning the normalized value if it is valid.
fn check_value(
    ty: &FieldType,
    value: &Value,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Value> {
    match (ty, value) {
        (FieldType::String, Value::String(_))
        | (FieldType::Boolean, Value::Bool(_))
        | (FieldType::Number, Value::Number(_)) => Some(value.clone()),
        (FieldType::Date, Value::String(s)) => match normalize_date(s) {
            Some(date) => Some(Value::String(date)),
            None => {
                issues.push(ValidationIssue::invalid_date(path, s));
                None
            }
        },
        (FieldType::Array(inner), Value::Array(items)) => {
            let before = issues.len();
            let checked: Vec<_> = items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| check_value(inner, item, &format!("{path}[{i}]"), issues))
                .collect();
            (issues.len() == before).then_some(Value::Array(checked))
        }
        (expected, received) => {
            issues.push(ValidationIssue::invalid_type(
                path,
                expected.to_string(),
                type_name(received),
            ));
            None
        }
    }
}

/// Normalize `YYYY-MM-DD`, RFC 3339 or offset-less datetimes.
fn normalize_date(s: &str) -> Option<String> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.format("%Y-%m-%d").to_string());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::AutoSi, true));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.and_utc().to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Human-readable JSON type name used in validation messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::IssueKind;

    fn post_schema() -> Schema {
        Schema::new()
            .field("title", FieldType::String)
            .field("draft", FieldType::Boolean)
            .field("authors", FieldType::array_of(FieldType::String))
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_valid_document_passes() {
        let data = object(json!({
            "title": "Hello",
            "draft": false,
            "authors": ["Aaron"]
        }));
        let out = post_schema().validate(&data).expect("valid");
        assert_eq!(out["title"], "Hello");
        assert_eq!(out["authors"], json!(["Aaron"]));
    }

    #[test]
    fn test_missing_title_is_named() {
        let data = object(json!({ "draft": false, "authors": [] }));
        let issues = post_schema().validate(&data).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "title");
        assert!(matches!(issues[0].kind, IssueKind::Missing { .. }));
    }

    #[test]
    fn test_non_boolean_draft_fails() {
        let data = object(json!({ "title": "x", "draft": "no", "authors": [] }));
        let issues = post_schema().validate(&data).unwrap_err();
        assert_eq!(
            issues,
            vec![ValidationIssue::invalid_type("draft", "boolean", "string")]
        );
    }

    #[test]
    fn test_array_item_path_reported() {
        let data = object(json!({ "title": "x", "draft": true, "authors": ["a", 3] }));
        let issues = post_schema().validate(&data).unwrap_err();
        assert_eq!(issues[0].field, "authors[1]");
    }

    #[test]
    fn test_collects_all_issues() {
        let issues = post_schema().validate(&Map::new()).unwrap_err();
        let fields: Vec<_> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["authors", "draft", "title"]);
    }

    #[test]
    fn test_unknown_key_policies() {
        let data = object(json!({ "title": "x", "extra": 1 }));
        let base = Schema::new().field("title", FieldType::String);

        let stripped = base.clone().validate(&data).expect("strip");
        assert!(!stripped.contains_key("extra"));

        let kept = base
            .clone()
            .unknown_keys(UnknownKeys::Passthrough)
            .validate(&data)
            .expect("passthrough");
        assert_eq!(kept["extra"], 1);

        let issues = base
            .unknown_keys(UnknownKeys::Strict)
            .validate(&data)
            .unwrap_err();
        assert_eq!(issues, vec![ValidationIssue::unknown_key("extra")]);
    }

    #[test]
    fn test_optional_and_default() {
        let schema = Schema::new()
            .field("title", FieldType::String)
            .with("subtitle", FieldSpec::optional(FieldType::String))
            .with(
                "draft",
                FieldSpec::required(FieldType::Boolean).with_default(json!(false)),
            );
        let out = schema.validate(&object(json!({ "title": "x" }))).expect("valid");
        assert!(!out.contains_key("subtitle"));
        assert_eq!(out["draft"], false);
    }

    #[test]
    fn test_null_is_not_a_string() {
        let schema = Schema::new().field("title", FieldType::String);
        let issues = schema
            .validate(&object(json!({ "title": null })))
            .unwrap_err();
        assert_eq!(
            issues,
            vec![ValidationIssue::invalid_type("title", "string", "null")]
        );
    }

    #[test]
    fn test_date_normalization() {
        let schema = Schema::new().field("date", FieldType::Date);
        let out = schema
            .validate(&object(json!({ "date": "2024-01-14" })))
            .expect("date");
        assert_eq!(out["date"], "2024-01-14");

        let out = schema
            .validate(&object(json!({ "date": "2024-01-14T10:00:00+02:00" })))
            .expect("datetime");
        assert_eq!(out["date"], "2024-01-14T08:00:00Z");

        let issues = schema
            .validate(&object(json!({ "date": "last tuesday" })))
            .unwrap_err();
        assert!(matches!(issues[0].kind, IssueKind::InvalidDate { .. }));
    }

    #[test]
    fn test_field_type_parsing() {
        assert_eq!("string".parse::<FieldType>().unwrap(), FieldType::String);
        assert_eq!("bool".parse::<FieldType>().unwrap(), FieldType::Boolean);
        assert_eq!(
            "string[]".parse::<FieldType>().unwrap(),
            FieldType::array_of(FieldType::String)
        );
        assert_eq!(
            "array<date>".parse::<FieldType>().unwrap(),
            FieldType::array_of(FieldType::Date)
        );
        assert!("object".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_schema_from_toml() {
        let schema: Schema = toml::from_str(
            r#"
unknown_keys = "strict"

[fields]
title = "string"
subtitle = "string?"
tags = "string[]"
authors = { type = "array", items = "string", default = [] }
"#,
        )
        .expect("deserialize");

        assert_eq!(schema.unknown_keys, UnknownKeys::Strict);
        assert!(!schema.fields["title"].optional);
        assert!(schema.fields["subtitle"].optional);
        assert_eq!(schema.fields["tags"].ty, FieldType::array_of(FieldType::String));
        assert_eq!(schema.fields["authors"].default, Some(json!([])));
        assert_eq!(schema.required_fields().collect::<Vec<_>>(), vec!["tags", "title"]);
    }

    #[test]
    fn test_bad_default_rejected() {
        let schema = Schema::new().with(
            "draft",
            FieldSpec::optional(FieldType::Boolean).with_default(json!("nope")),
        );
        assert!(schema.check_definition().is_err());
        assert!(Schema::new().check_definition().is_err());
    }
}
