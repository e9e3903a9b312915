//! Site configuration management.
//!
//! `blogsmith.toml` carries two independent halves: the build half (site URL,
//! bundler plugins, UI integrations, deployment adapter) and the content half
//! (collection definitions). Paths inside it are relative to the directory
//! holding the file.

use std::{
    collections::BTreeMap,
    fmt,
    path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{CoreError, Result},
    glob::GlobPattern,
    schema::{FieldType, Schema},
};

/// Main configuration structure for blogsmith.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Public base URL of the deployed site (e.g., "https://example.com").
    pub site: String,

    /// Deployment target.
    #[serde(default)]
    pub adapter: Adapter,

    /// UI framework integrations.
    #[serde(default)]
    pub integrations: Vec<Plugin>,

    /// Bundler settings.
    #[serde(default)]
    pub vite: BundlerConfig,

    /// Markdown processing settings.
    #[serde(default)]
    pub markdown: MarkdownConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Content collections by name.
    #[serde(default = "default_collections")]
    pub collections: BTreeMap<String, CollectionConfig>,

    /// Project root; the directory containing the config file.
    #[serde(skip, default = "default_root")]
    pub root: PathBuf,
}

/// Deployment adapter selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adapter {
    Netlify,
    Vercel,
    Cloudflare,
    Node,
    /// Plain static output, no host-specific files.
    #[default]
    Static,
}

impl fmt::Display for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Netlify => "netlify",
            Self::Vercel => "vercel",
            Self::Cloudflare => "cloudflare",
            Self::Node => "node",
            Self::Static => "static",
        };
        f.write_str(name)
    }
}

/// A named plugin or integration with free-form options.
///
/// Written either as a bare name (`"react"`) or as a table
/// (`{ name = "react", options = { include = ["**/react/*"] } }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPlugin")]
pub struct Plugin {
    pub name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, Value>,
}

impl Plugin {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: BTreeMap::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPlugin {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        options: BTreeMap<String, Value>,
    },
}

impl From<RawPlugin> for Plugin {
    fn from(raw: RawPlugin) -> Self {
        match raw {
            RawPlugin::Name(name) => Self::named(name),
            RawPlugin::Full { name, options } => Self { name, options },
        }
    }
}

/// Bundler configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundlerConfig {
    /// Bundler plugins, e.g. `tailwindcss`.
    #[serde(default)]
    pub plugins: Vec<Plugin>,
}

/// Markdown configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Remark plugins applied to markdown content.
    #[serde(default)]
    pub remark_plugins: Vec<Plugin>,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Where `sync` writes the collection data store, relative to the root.
    #[serde(default = "default_data_store")]
    pub data_store: String,

    /// Whether draft entries are written to the data store.
    #[serde(default)]
    pub drafts: bool,
}

/// A content collection: where to find documents and how to validate them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub loader: LoaderConfig,
    pub schema: Schema,
}

/// Glob loader settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Glob pattern relative to `base`.
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Directory searched for documents, relative to the project root.
    pub base: PathBuf,
}

impl CollectionConfig {
    /// The blog collection under `src/content/post`.
    pub fn blog() -> Self {
        Self {
            loader: LoaderConfig {
                pattern: default_pattern(),
                base: PathBuf::from("./src/content/post"),
            },
            schema: Schema::new()
                .field("title", FieldType::String)
                .field("pageTitle", FieldType::String)
                .field("slug", FieldType::String)
                .field("draft", FieldType::Boolean)
                .field("imgSrc", FieldType::String)
                .field("description", FieldType::String)
                .field("date", FieldType::String)
                .field("authors", FieldType::array_of(FieldType::String)),
        }
    }

    /// The older blog definition under `src/pages/post`, without `slug`,
    /// `draft`, `date` and `authors`.
    pub fn legacy_blog() -> Self {
        Self {
            loader: LoaderConfig {
                pattern: default_pattern(),
                base: PathBuf::from("./src/pages/post"),
            },
            schema: Schema::new()
                .field("title", FieldType::String)
                .field("pageTitle", FieldType::String)
                .field("imgSrc", FieldType::String)
                .field("description", FieldType::String),
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        GlobPattern::new(&self.loader.pattern).map_err(|e| {
            CoreError::config(format!("collections.{name}.loader.pattern: {e}"))
        })?;

        let base = &self.loader.base;
        if base.has_root() {
            return Err(CoreError::config(format!(
                "collections.{name}.loader.base must be relative to the project root"
            )));
        }
        if base
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(CoreError::config(format!(
                "collections.{name}.loader.base must not contain '..'"
            )));
        }

        self.schema.check_definition().map_err(|e| {
            CoreError::config(format!("collections.{name}.schema: {e}"))
        })
    }
}

// Default value functions
fn default_pattern() -> String {
    "**/*.md".to_string()
}

fn default_data_store() -> String {
    ".blogsmith/data-store.json".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_collections() -> BTreeMap<String, CollectionConfig> {
    BTreeMap::from([("blog".to_string(), CollectionConfig::blog())])
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            data_store: default_data_store(),
            drafts: false,
        }
    }
}

/// Values that may be overridden from `BLOGSMITH_*` environment variables.
#[derive(Debug, Default, Deserialize)]
struct EnvOverrides {
    site: Option<String>,
    adapter: Option<Adapter>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, then apply `BLOGSMITH_SITE` / `BLOGSMITH_ADAPTER`.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let mut config = Self::read(path)?;

        let overrides: EnvOverrides = config::Config::builder()
            .add_source(config::Environment::with_prefix("BLOGSMITH"))
            .build()?
            .try_deserialize()?;

        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Read and parse the file without validating it.
    fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => default_root(),
        };

        Ok(config)
    }

    /// Parse configuration from a TOML string rooted at the current directory.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, overrides: EnvOverrides) {
        if let Some(site) = overrides.site {
            tracing::info!(site = %site, "Overriding site from environment");
            self.site = site;
        }
        if let Some(adapter) = overrides.adapter {
            tracing::info!(%adapter, "Overriding adapter from environment");
            self.adapter = adapter;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.is_empty() {
            return Err(CoreError::config("site cannot be empty"));
        }

        if !(self.site.starts_with("http://") || self.site.starts_with("https://")) {
            return Err(CoreError::config("site must start with http:// or https://"));
        }

        if self.site.ends_with('/') {
            tracing::warn!("site should not have a trailing slash");
        }

        let mut plugins = self
            .integrations
            .iter()
            .chain(&self.vite.plugins)
            .chain(&self.markdown.remark_plugins);
        if plugins.any(|p| p.name.trim().is_empty()) {
            return Err(CoreError::config("plugin names cannot be empty"));
        }

        for (name, collection) in &self.collections {
            if name.trim().is_empty() {
                return Err(CoreError::config("collection names cannot be empty"));
            }
            collection.validate(name)?;
        }

        Ok(())
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.site.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Resolve a path relative to the project root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Look up a collection definition by name.
    pub fn collection(&self, name: &str) -> Option<&CollectionConfig> {
        self.collections.get(name)
    }
}
