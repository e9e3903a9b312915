//! Content store.
//!
//! Loads every collection, validates each document against its schema and
//! serves the resulting entries to page templates through the data store.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use blogsmith_core::{CoreError, parse_frontmatter};
use rayon::prelude::*;
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::{
    collection::{CollectionDef, Collections},
    entry::{Entry, entry_id},
    error::{ContentError, Result},
};

/// Validated entries of every collection.
#[derive(Debug, Default)]
pub struct ContentStore {
    /// Collection name -> entry id -> entry.
    collections: BTreeMap<String, BTreeMap<String, Entry>>,
}

/// Outcome of checking one collection without stopping at the first failure.
#[derive(Debug)]
pub struct CollectionReport {
    pub name: String,
    /// Base directory relative to the project root.
    pub base: PathBuf,
    pub base_exists: bool,
    /// Number of files the loader matched.
    pub files: usize,
    /// Number of files that passed validation.
    pub valid: usize,
    pub errors: Vec<ContentError>,
}

/// Outcome of checking all collections.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub collections: Vec<CollectionReport>,
}

impl CheckReport {
    pub fn error_count(&self) -> usize {
        self.collections.iter().map(|c| c.errors.len()).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Non-fatal findings: missing base directories and empty collections.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for report in &self.collections {
            if !report.base_exists {
                warnings.push(format!(
                    "collection '{}': base directory {} does not exist",
                    report.name,
                    report.base.display()
                ));
            } else if report.files == 0 {
                warnings.push(format!(
                    "collection '{}': no files matched under {}",
                    report.name,
                    report.base.display()
                ));
            }
        }
        warnings
    }
}

impl ContentStore {
    /// Load and validate every collection.
    ///
    /// Stops at the first invalid document, in collection-name then path order.
    pub fn load(root: &Path, collections: &Collections) -> Result<Self> {
        let mut store = Self::default();

        for def in collections.iter() {
            let results = read_collection(root, def)?;
            let mut entries = BTreeMap::new();
            for result in results {
                insert_entry(&mut entries, result?);
            }

            info!(collection = %def.name, entries = entries.len(), "collection loaded");
            store.collections.insert(def.name.clone(), entries);
        }

        info!(
            collections = store.collections.len(),
            entries = store.len(),
            "content store ready"
        );
        Ok(store)
    }

    /// Validate every document of every collection and report all failures.
    pub fn check(root: &Path, collections: &Collections) -> Result<CheckReport> {
        let mut report = CheckReport::default();

        for def in collections.iter() {
            let results = read_collection(root, def)?;
            let files = results.len();
            let errors: Vec<_> = results.into_iter().filter_map(|r| r.err()).collect();

            report.collections.push(CollectionReport {
                name: def.name.clone(),
                base: def.loader.base().to_path_buf(),
                base_exists: def.loader.base_dir(root).is_dir(),
                files,
                valid: files - errors.len(),
                errors,
            });
        }

        Ok(report)
    }

    /// Names of loaded collections.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// All entries of a collection in id order.
    pub fn collection(&self, name: &str) -> Result<Vec<&Entry>> {
        self.collections
            .get(name)
            .map(|entries| entries.values().collect())
            .ok_or_else(|| ContentError::UnknownCollection(name.to_string()))
    }

    /// Look up a single entry.
    pub fn entry(&self, collection: &str, id: &str) -> Option<&Entry> {
        self.collections.get(collection)?.get(id)
    }

    /// Entries not marked as drafts.
    pub fn published(&self, name: &str) -> Result<Vec<&Entry>> {
        Ok(self
            .collection(name)?
            .into_iter()
            .filter(|e| !e.is_draft())
            .collect())
    }

    /// Entries sorted by date, newest first; undated entries last.
    pub fn sorted_by_date(&self, name: &str) -> Result<Vec<&Entry>> {
        let mut entries = self.collection(name)?;
        entries.sort_by(|a, b| match (b.date(), a.date()) {
            (Some(b_date), Some(a_date)) => b_date.cmp(&a_date).then_with(|| a.id.cmp(&b.id)),
            (Some(_), None) => std::cmp::Ordering::Greater,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (None, None) => a.id.cmp(&b.id),
        });
        Ok(entries)
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.collections.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// JSON data store: `{ "collections": { name: [entry, ...] } }`.
    pub fn to_data_store(&self, include_drafts: bool) -> Result<Value> {
        let mut collections = Map::new();
        for (name, entries) in &self.collections {
            let items = entries
                .values()
                .filter(|e| include_drafts || !e.is_draft())
                .map(serde_json::to_value)
                .collect::<serde_json::Result<Vec<_>>>()
                .map_err(CoreError::from)?;
            collections.insert(name.clone(), Value::Array(items));
        }

        Ok(json!({ "collections": collections }))
    }

    /// Write the data store as pretty-printed JSON, creating parent directories.
    pub fn write_data_store(&self, path: &Path, include_drafts: bool) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.to_data_store(include_drafts)?)
            .map_err(CoreError::from)?;
        fs::write(path, json)?;
        info!(path = %path.display(), "data store written");
        Ok(())
    }
}

fn insert_entry(entries: &mut BTreeMap<String, Entry>, entry: Entry) {
    if let Some(previous) = entries.get(&entry.id) {
        warn!(
            id = %entry.id,
            previous = %previous.file_path.display(),
            current = %entry.file_path.display(),
            "duplicate id, later file wins"
        );
    }
    entries.insert(entry.id.clone(), entry);
}

/// Discover and parse a collection's files in parallel, keeping path order.
fn read_collection(root: &Path, def: &CollectionDef) -> Result<Vec<Result<Entry>>> {
    let files = def.loader.discover(root)?;
    info!(collection = %def.name, count = files.len(), "found content files");

    Ok(files
        .par_iter()
        .map(|relative| read_entry(root, def, relative))
        .collect())
}

fn read_entry(root: &Path, def: &CollectionDef, relative: &Path) -> Result<Entry> {
    let file_path = def.loader.base().join(relative);
    debug!(path = %file_path.display(), "parsing file");

    let content = fs::read_to_string(root.join(&file_path)).map_err(|source| {
        ContentError::Read {
            path: file_path.clone(),
            source,
        }
    })?;

    let (raw, body) = parse_frontmatter(&content, &file_path)?;
    let data = def
        .schema
        .validate(&raw)
        .map_err(|issues| CoreError::validation(&def.name, &file_path, issues))?;

    Ok(Entry {
        id: entry_id(relative, &raw),
        collection: def.name.clone(),
        file_path,
        data,
        body,
    })
}
