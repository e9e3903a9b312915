//! Blogsmith Core Library
//!
//! Configuration, front-matter parsing, glob patterns and schema validation
//! shared by the content store and the CLI.

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod glob;
pub mod schema;

pub use config::{Adapter, CollectionConfig, Config, LoaderConfig, Plugin};
pub use error::{CoreError, IssueKind, Result, ValidationIssue};
pub use frontmatter::parse_frontmatter;
pub use glob::GlobPattern;
pub use schema::{FieldSpec, FieldType, Schema, UnknownKeys};
