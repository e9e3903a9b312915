//! Blogsmith content collections.
//!
//! Discovers markdown documents with glob loaders, validates their front
//! matter against each collection's schema, and exposes the resulting entries
//! through a [`ContentStore`].

pub mod collection;
pub mod entry;
pub mod error;
pub mod loader;
pub mod store;

pub use collection::{CollectionDef, Collections, blog_collection, legacy_blog_collection};
pub use entry::{Entry, entry_id, slugify};
pub use error::{ContentError, Result};
pub use loader::GlobLoader;
pub use store::{CheckReport, CollectionReport, ContentStore};
