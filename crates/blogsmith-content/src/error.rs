//! Content loading errors.

use std::path::PathBuf;

use blogsmith_core::CoreError;
use thiserror::Error;

/// Content collection errors.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Configuration, front-matter, glob or validation error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A content file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A collection name was defined twice.
    #[error("collection '{name}' is already defined (loading from {existing})")]
    DuplicateCollection { name: String, existing: PathBuf },

    /// A query named a collection that does not exist.
    #[error("unknown collection '{0}'")]
    UnknownCollection(String),
}

/// Result type for content operations.
pub type Result<T> = std::result::Result<T, ContentError>;

impl ContentError {
    /// Whether this error comes from a document failing its schema.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Core(CoreError::Validation { .. }))
    }
}
