//! Collection definitions and the collection registry.

use std::collections::{BTreeMap, btree_map};

use blogsmith_core::{CollectionConfig, Config, Schema};

use crate::{
    error::{ContentError, Result},
    loader::GlobLoader,
};

/// A named collection: a loader plus the schema its documents must satisfy.
#[derive(Debug, Clone)]
pub struct CollectionDef {
    pub name: String,
    pub loader: GlobLoader,
    pub schema: Schema,
}

impl CollectionDef {
    pub fn new(name: impl Into<String>, loader: GlobLoader, schema: Schema) -> Self {
        Self {
            name: name.into(),
            loader,
            schema,
        }
    }

    /// Compile a collection from its configuration.
    pub fn from_config(name: impl Into<String>, config: &CollectionConfig) -> Result<Self> {
        Ok(Self::new(
            name,
            GlobLoader::from_config(&config.loader)?,
            config.schema.clone(),
        ))
    }
}

/// The active `blog` collection: `**/*.md` under `src/content/post`.
pub fn blog_collection() -> Result<CollectionDef> {
    CollectionDef::from_config("blog", &CollectionConfig::blog())
}

/// The older `blog` definition under `src/pages/post`.
///
/// It shares the `blog` name with [`blog_collection`], so a registry can hold
/// only one of the two.
pub fn legacy_blog_collection() -> Result<CollectionDef> {
    CollectionDef::from_config("blog", &CollectionConfig::legacy_blog())
}

/// Registry of collections keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    defs: BTreeMap<String, CollectionDef>,
}

impl Collections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection. A name may only be defined once.
    pub fn define(&mut self, def: CollectionDef) -> Result<()> {
        match self.defs.entry(def.name.clone()) {
            btree_map::Entry::Occupied(existing) => Err(ContentError::DuplicateCollection {
                name: def.name,
                existing: existing.get().loader.base().to_path_buf(),
            }),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(def);
                Ok(())
            }
        }
    }

    /// All collections declared by a configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut collections = Self::new();
        for (name, collection) in &config.collections {
            collections.define(CollectionDef::from_config(name, collection)?)?;
        }
        Ok(collections)
    }

    pub fn get(&self, name: &str) -> Option<&CollectionDef> {
        self.defs.get(name)
    }

    /// Collections in name order.
    pub fn iter(&self) -> impl Iterator<Item = &CollectionDef> {
        self.defs.values()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
