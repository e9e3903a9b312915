//! Glob patterns for content discovery.
//!
//! Matching is done by `wax`: `*` and `?` stay inside one path segment, `**`
//! spans zero or more segments and `{md,markdown}` is alternation.
//!
//! Patterns are always relative to a loader base directory. Absolute patterns
//! and `..` segments are rejected so a match can never leave the base.

use std::{
    fmt,
    path::{Component, Path},
};

use wax::{Glob, Pattern};

use crate::error::{CoreError, Result};

/// A compiled glob pattern.
#[derive(Clone)]
pub struct GlobPattern {
    source: String,
    glob: Glob<'static>,
}

impl fmt::Debug for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GlobPattern").field(&self.source).finish()
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl GlobPattern {
    /// Compile a pattern such as `**/*.md`.
    pub fn new(pattern: &str) -> Result<Self> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(CoreError::glob(pattern, "pattern is empty"));
        }
        if trimmed.starts_with(['/', '\\']) || Path::new(trimmed).has_root() {
            return Err(CoreError::glob(pattern, "pattern must be relative"));
        }
        if trimmed.split(['/', '\\']).any(|part| part == "..") {
            return Err(CoreError::glob(pattern, "'..' would leave the base directory"));
        }

        let glob = Glob::new(trimmed)
            .map_err(|e| CoreError::glob(pattern, e.to_string()))?
            .into_owned();

        Ok(Self {
            source: trimmed.to_string(),
            glob,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Test a path relative to the base directory.
    pub fn is_match(&self, relative: &Path) -> bool {
        let mut names = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(os) => match os.to_str() {
                    Some(s) => names.push(s),
                    None => return false,
                },
                Component::CurDir => {}
                // Anything escaping or anchoring the path never matches.
                _ => return false,
            }
        }

        self.glob.is_match(names.join("/").as_str())
    }
}

impl PartialEq for GlobPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for GlobPattern {}
