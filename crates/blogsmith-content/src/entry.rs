//! Collection entries and id derivation.

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A validated document in a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Unique id within the collection.
    pub id: String,

    /// Name of the owning collection.
    pub collection: String,

    /// Source file, relative to the project root.
    pub file_path: PathBuf,

    /// Front matter after schema validation.
    pub data: Map<String, Value>,

    /// Markdown body without the front matter.
    pub body: String,
}

impl Entry {
    /// Whether the entry is marked `draft: true`.
    pub fn is_draft(&self) -> bool {
        matches!(self.data.get("draft"), Some(Value::Bool(true)))
    }

    /// The `title` field, if it is a string.
    pub fn title(&self) -> Option<&str> {
        self.data.get("title").and_then(Value::as_str)
    }

    /// The `date` field parsed as a timestamp.
    ///
    /// Accepts `YYYY-MM-DD` and RFC 3339; anything else counts as undated.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        let raw = self.data.get("date")?.as_str()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

/// Derive an entry id.
///
/// A non-empty string `slug` in the front matter wins. Otherwise the id is the
/// path relative to the loader base without its extension, slugified, with
/// `index` files taking their directory's name:
/// - `hello-world.md` → `hello-world`
/// - `2024/My Trip.md` → `2024/my-trip`
/// - `guides/setup/index.md` → `guides/setup`
pub fn entry_id(relative: &Path, data: &Map<String, Value>) -> String {
    if let Some(slug) = data.get("slug").and_then(Value::as_str) {
        let slug = slug.trim().trim_matches('/');
        if !slug.is_empty() {
            return slug.to_string();
        }
    }

    let mut segments: Vec<String> = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .filter_map(|c| match c {
            Component::Normal(s) => Some(slugify(&s.to_string_lossy())),
            _ => None,
        })
        .collect();

    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    if stem != "index" || segments.is_empty() {
        segments.push(slugify(&stem));
    }

    segments.join("/")
}

/// Lowercase, turn whitespace into `-`, drop anything that is not
/// alphanumeric, `-` or `_`. Applied per path segment.
pub fn slugify(s: &str) -> String {
    s.trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('-')
            } else if c.is_alphanumeric() || matches!(c, '-' | '_') {
                Some(c)
            } else {
                None
            }
        })
        .flat_map(char::to_lowercase)
        .collect()
}
