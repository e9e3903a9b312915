//! Sync command - load every collection and write the data store

use std::{path::Path, time::Instant};

use blogsmith_content::{Collections, ContentStore};
use blogsmith_core::Config;
use color_eyre::eyre::{Result, WrapErr};

/// Run the sync command.
///
/// A single invalid document aborts the sync; nothing is written in that case.
pub fn run(config_path: &Path, out: Option<&Path>, drafts: bool) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?out, drafts, "Starting sync");

    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    tracing::debug!(?config, "Loaded configuration");

    let collections =
        Collections::from_config(&config).wrap_err("Failed to set up collections")?;
    let store =
        ContentStore::load(&config.root, &collections).wrap_err("Content validation failed")?;

    let output = match out {
        Some(path) => path.to_path_buf(),
        None => config.resolve(&config.build.data_store),
    };
    let include_drafts = drafts || config.build.drafts;

    store
        .write_data_store(&output, include_drafts)
        .wrap_err_with(|| format!("Failed to write {}", output.display()))?;

    let duration = start.elapsed();

    println!();
    println!("  Sync completed successfully!");
    println!();
    for name in store.collection_names() {
        let total = store.collection(name).map(|e| e.len()).unwrap_or_default();
        let published = store.published(name).map(|e| e.len()).unwrap_or_default();
        println!("  {name:<12} {published} published, {} draft(s)", total - published);
    }
    println!();
    println!("  Drafts:     {}", if include_drafts { "included" } else { "excluded" });
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output.display());
    println!();

    tracing::info!(entries = store.len(), ?duration, "Sync completed successfully");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(
            dir.path().join("blogsmith.toml"),
            r#"
site = "https://example.com"

[collections.notes]
loader = { base = "notes" }
schema = { fields = { title = "string", draft = "boolean" } }
"#,
        )
        .expect("write config");
        fs::create_dir_all(dir.path().join("notes")).expect("mkdir");
        fs::write(
            dir.path().join("notes/live.md"),
            "---\ntitle: Live\ndraft: false\n---\n",
        )
        .expect("write");
        fs::write(
            dir.path().join("notes/wip.md"),
            "---\ntitle: Wip\ndraft: true\n---\n",
        )
        .expect("write");
        dir
    }

    #[test]
    fn test_sync_writes_default_data_store() {
        let dir = site();
        run(&dir.path().join("blogsmith.toml"), None, false).expect("sync");

        let written = fs::read_to_string(dir.path().join(".blogsmith/data-store.json"))
            .expect("data store exists");
        let value: serde_json::Value = serde_json::from_str(&written).expect("json");
        let notes = value["collections"]["notes"].as_array().expect("array");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0]["id"], "live");
    }

    #[test]
    fn test_sync_with_drafts_and_custom_out() {
        let dir = site();
        let out = dir.path().join("dist/data.json");
        run(&dir.path().join("blogsmith.toml"), Some(&out), true).expect("sync");

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).expect("read")).expect("json");
        assert_eq!(value["collections"]["notes"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_sync_halts_on_invalid_document() {
        let dir = site();
        fs::write(dir.path().join("notes/bad.md"), "---\ndraft: false\n---\n").expect("write");

        let err = run(&dir.path().join("blogsmith.toml"), None, false).unwrap_err();
        assert!(format!("{err:?}").contains("title"));
        assert!(!dir.path().join(".blogsmith/data-store.json").exists());
    }
}
