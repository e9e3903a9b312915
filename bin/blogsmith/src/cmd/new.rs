//! New command - create a document whose front matter matches its schema

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use blogsmith_content::slugify;
use blogsmith_core::{Config, FieldSpec, FieldType, GlobPattern, Schema};
use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use serde_json::Value;

/// Run the new command.
///
/// Creates `<name>.md` under the collection's base directory with a
/// placeholder for every schema field.
pub fn run(config_path: &Path, name: &Path, collection: &str) -> Result<()> {
    tracing::info!(?name, collection, "Creating new content");

    let config = Config::load(config_path).wrap_err("Failed to load configuration")?;
    let definition = config
        .collection(collection)
        .ok_or_else(|| eyre!("Unknown collection '{collection}'"))?;

    let relative = document_path(name)?;
    let pattern = GlobPattern::new(&definition.loader.pattern)?;
    let hidden = relative
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(['.', '_']));
    if hidden || !pattern.is_match(&relative) {
        bail!(
            "{} would not be loaded by collection '{collection}' (pattern {pattern})",
            relative.display()
        );
    }

    let file_path = config.resolve(&definition.loader.base).join(&relative);

    if file_path.exists() {
        bail!("{} already exists", file_path.display());
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).wrap_err("Failed to create directories")?;
    }

    let stem = relative
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");
    fs::write(&file_path, generate_document(&definition.schema, stem))
        .wrap_err("Failed to write file")?;

    tracing::info!(?file_path, "Created new content file");
    println!("Created: {}", file_path.display());

    Ok(())
}

/// Path of the new document relative to the collection base.
///
/// `name` must stay inside the base, and gets `.md` appended unless it
/// already ends in `.md` or `.markdown`.
fn document_path(name: &Path) -> Result<PathBuf> {
    if name.as_os_str().is_empty()
        || name.components().any(|c| !matches!(c, Component::Normal(_)))
    {
        bail!(
            "Invalid name '{}': must be a relative path without '.' or '..'",
            name.display()
        );
    }

    let markdown = name
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"));
    if markdown {
        return Ok(name.to_path_buf());
    }

    let mut file_name = name.as_os_str().to_owned();
    file_name.push(".md");
    Ok(PathBuf::from(file_name))
}

/// Render front matter with one line per schema field, then a body stub.
fn generate_document(schema: &Schema, stem: &str) -> String {
    let title = stem.replace(['-', '_'], " ");
    let mut out = String::from("---\n");

    for (field, spec) in &schema.fields {
        let value = placeholder(field, spec, stem, &title);
        // JSON scalars and arrays are valid YAML flow values.
        let rendered = serde_json::to_string(&value).unwrap_or_else(|_| "null".to_string());
        out.push_str(&format!("{field}: {rendered}\n"));
    }

    out.push_str("---\n\nWrite your content here.\n");
    out
}

fn placeholder(field: &str, spec: &FieldSpec, stem: &str, title: &str) -> Value {
    if let Some(default) = &spec.default {
        return default.clone();
    }

    match (&spec.ty, field) {
        (FieldType::String, "slug") => Value::from(slugify(stem)),
        (FieldType::String | FieldType::Date, "date") | (FieldType::Date, _) => {
            Value::from(Utc::now().format("%Y-%m-%d").to_string())
        }
        (FieldType::String, _) => Value::from(title),
        (FieldType::Boolean, "draft") => Value::Bool(true),
        (FieldType::Boolean, _) => Value::Bool(false),
        (FieldType::Number, _) => Value::from(0),
        (FieldType::Array(_), _) => Value::Array(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use blogsmith_content::{Collections, ContentStore};

    use super::*;

    #[test]
    fn test_new_document_passes_blog_schema() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("blogsmith.toml");
        fs::write(&config_path, "site = \"https://example.com\"\n").expect("write config");

        run(&config_path, Path::new("My First Post"), "blog").expect("create");

        let created = dir.path().join("src/content/post/My First Post.md");
        let content = fs::read_to_string(&created).expect("read");
        assert!(content.contains("title: \"My First Post\""));
        assert!(content.contains("slug: \"my-first-post\""));
        assert!(content.contains("draft: true"));
        assert!(content.contains("authors: []"));

        let config = Config::load(&config_path).expect("config");
        let collections = Collections::from_config(&config).expect("collections");
        let store = ContentStore::load(&config.root, &collections).expect("generated file is valid");
        assert!(store.entry("blog", "my-first-post").is_some_and(|e| e.is_draft()));
    }

    #[test]
    fn test_new_refuses_to_overwrite() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("blogsmith.toml");
        fs::write(&config_path, "site = \"https://example.com\"\n").expect("write config");

        run(&config_path, Path::new("post"), "blog").expect("create");
        assert!(run(&config_path, Path::new("post"), "blog").is_err());
    }

    #[test]
    fn test_new_unknown_collection() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("blogsmith.toml");
        fs::write(&config_path, "site = \"https://example.com\"\n").expect("write config");

        let err = run(&config_path, Path::new("post"), "notes").unwrap_err();
        assert!(err.to_string().contains("Unknown collection"));
    }

    #[test]
    fn test_new_dotted_name_gets_md_extension() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("blogsmith.toml");
        fs::write(&config_path, "site = \"https://example.com\"\n").expect("write config");

        run(&config_path, Path::new("release-1.0"), "blog").expect("create");
        assert!(dir.path().join("src/content/post/release-1.0.md").exists());

        let config = Config::load(&config_path).expect("config");
        let collections = Collections::from_config(&config).expect("collections");
        let store = ContentStore::load(&config.root, &collections).expect("load");
        assert_eq!(store.len(), 1);
        assert!(store.entry("blog", "release-10").is_some());
    }

    #[test]
    fn test_new_rejects_names_outside_base() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("blogsmith.toml");
        fs::write(&config_path, "site = \"https://example.com\"\n").expect("write config");

        for name in ["../../../escaped", "/tmp/escaped", "./post", "a/../b"] {
            let err = run(&config_path, Path::new(name), "blog").unwrap_err();
            assert!(err.to_string().contains("Invalid name"), "{name}: {err}");
        }
        assert!(!dir.path().join("escaped.md").exists());
    }

    #[test]
    fn test_new_rejects_names_the_loader_skips() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("blogsmith.toml");
        fs::write(
            &config_path,
            r#"
site = "https://example.com"

[collections.notes]
loader = { pattern = "*.markdown", base = "notes" }
schema = { fields = { title = "string" } }
"#,
        )
        .expect("write config");

        assert!(run(&config_path, Path::new("nested/post"), "notes").is_err());
        assert!(run(&config_path, Path::new("_partial.markdown"), "notes").is_err());
        run(&config_path, Path::new("kept.markdown"), "notes").expect("create");
        assert!(dir.path().join("notes/kept.markdown").exists());
    }

    #[test]
    fn test_placeholders_follow_types() {
        let schema = Schema::new()
            .field("published", FieldType::Date)
            .field("rating", FieldType::Number)
            .field("featured", FieldType::Boolean);
        let doc = generate_document(&schema, "x");
        assert!(doc.contains("rating: 0\n"));
        assert!(doc.contains("featured: false\n"));
        assert!(doc.contains("published: \"20"));
    }
}
