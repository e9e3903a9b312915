//! Error types for the blogsmith core library.

use std::{fmt, path::PathBuf};

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for blogsmith.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration loading or parsing error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Frontmatter parsing error.
    #[error("Frontmatter error in {path}: {message}")]
    Frontmatter { path: PathBuf, message: String },

    /// Invalid glob pattern.
    #[error("Invalid glob pattern '{pattern}': {message}")]
    Glob { pattern: String, message: String },

    /// Invalid schema definition.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A document failed schema validation.
    #[error("Validation error in {collection} entry {path}: {}", join_issues(.issues))]
    Validation {
        collection: String,
        path: PathBuf,
        issues: Vec<ValidationIssue>,
    },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic configuration crate error.
    #[error("Config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

/// A single schema violation inside a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Field path, e.g. `title` or `authors[1]`.
    pub field: String,
    pub kind: IssueKind,
}

/// What went wrong with a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Required field is absent.
    Missing { expected: String },
    /// Field is present with the wrong type.
    InvalidType { expected: String, received: String },
    /// Field is a string that is not a valid date.
    InvalidDate { value: String },
    /// Key not declared by a strict schema.
    UnknownKey,
}

impl ValidationIssue {
    pub fn missing(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: IssueKind::Missing {
                expected: expected.into(),
            },
        }
    }

    pub fn invalid_type(
        field: impl Into<String>,
        expected: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            kind: IssueKind::InvalidType {
                expected: expected.into(),
                received: received.into(),
            },
        }
    }

    pub fn invalid_date(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: IssueKind::InvalidDate {
                value: value.into(),
            },
        }
    }

    pub fn unknown_key(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: IssueKind::UnknownKey,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Missing { expected } => {
                write!(f, "{}: required {expected} is missing", self.field)
            }
            IssueKind::InvalidType { expected, received } => {
                write!(f, "{}: expected {expected}, received {received}", self.field)
            }
            IssueKind::InvalidDate { value } => {
                write!(f, "{}: '{value}' is not a valid date", self.field)
            }
            IssueKind::UnknownKey => write!(f, "{}: unrecognized key", self.field),
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new frontmatter error.
    pub fn frontmatter(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Frontmatter {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new glob pattern error.
    pub fn glob(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Glob {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a new schema definition error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create a validation error for a document.
    pub fn validation(
        collection: impl Into<String>,
        path: impl Into<PathBuf>,
        issues: Vec<ValidationIssue>,
    ) -> Self {
        Self::Validation {
            collection: collection.into(),
            path: path.into(),
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = CoreError::config("missing field");
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_frontmatter_error() {
        let err = CoreError::frontmatter("src/content/post/hello.md", "bad yaml");
        assert!(err.to_string().contains("Frontmatter error"));
        assert!(err.to_string().contains("hello.md"));
    }

    #[test]
    fn test_validation_error_names_document_and_fields() {
        let err = CoreError::validation(
            "blog",
            "hello.md",
            vec![
                ValidationIssue::missing("title", "string"),
                ValidationIssue::invalid_type("draft", "boolean", "string"),
            ],
        );
        let msg = err.to_string();
        assert!(msg.contains("blog entry hello.md"));
        assert!(msg.contains("title: required string is missing"));
        assert!(msg.contains("draft: expected boolean, received string"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CoreError = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }
}
