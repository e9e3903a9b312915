//! Frontmatter parsing for content files.
//!
//! Front matter is kept schema-agnostic here: it is parsed into a JSON object
//! and handed to [`crate::schema::Schema`] for typing.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into frontmatter and body.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start_matches('\u{feff}').trim_start();

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };

    let delimiter = format.delimiter();
    let after_first = &content[delimiter.len()..];

    // The closing delimiter must start a line.
    let closing_pos = after_first
        .match_indices(delimiter)
        .map(|(pos, _)| pos)
        .find(|&pos| after_first[..pos].ends_with('\n'))?;

    let frontmatter = after_first[..closing_pos].trim();
    let body = after_first[closing_pos + delimiter.len()..].trim_start();

    Some((format, frontmatter, body))
}

/// Parse frontmatter from a string into a JSON object and the remaining body.
///
/// A document with no frontmatter yields an empty object, so schema
/// validation reports every required field as missing.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(Map<String, Value>, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Ok((Map::new(), content.to_string()));
    };

    if fm_str.is_empty() {
        return Ok((Map::new(), body.to_string()));
    }

    let value = match format {
        FrontmatterFormat::Yaml => serde_yaml::from_str::<Value>(fm_str)
            .map_err(|e| CoreError::frontmatter(path, e.to_string()))?,
        FrontmatterFormat::Toml => toml::from_str::<toml::Table>(fm_str)
            .map(|table| toml_to_json(toml::Value::Table(table)))
            .map_err(|e| CoreError::frontmatter(path, e.to_string()))?,
    };

    match value {
        Value::Object(map) => Ok((map, body.to_string())),
        Value::Null => Ok((Map::new(), body.to_string())),
        other => Err(CoreError::frontmatter(
            path,
            format!("expected a mapping, found {}", crate::schema::type_name(&other)),
        )),
    }
}

/// Convert a TOML value to JSON, rendering datetimes as strings.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
