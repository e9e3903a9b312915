//! Check command - validate configuration and content

use std::path::Path;

use blogsmith_content::{Collections, ContentStore};
use blogsmith_core::Config;
use color_eyre::eyre::{Result, bail};

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates the configuration and every document of every collection,
/// reporting all failures rather than stopping at the first.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            Some(c)
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            None
        }
    };

    if let Some(ref cfg) = config {
        check_config_values(cfg, &mut result);

        println!("\nChecking collections...");
        match Collections::from_config(cfg) {
            Ok(collections) => check_collections(cfg, &collections, &mut result)?,
            Err(e) => result.add_error(format!("Collection error: {e}")),
        }
    }

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Validate each collection's documents.
fn check_collections(
    config: &Config,
    collections: &Collections,
    result: &mut ValidationResult,
) -> Result<()> {
    let report = ContentStore::check(&config.root, collections)?;

    for collection in &report.collections {
        if collection.errors.is_empty() {
            println!(
                "  ✓ {}: all {} document(s) valid ({})",
                collection.name,
                collection.files,
                collection.base.display()
            );
        } else {
            println!(
                "  ✗ {}: {}/{} document(s) have errors",
                collection.name,
                collection.errors.len(),
                collection.files
            );
        }

        for err in &collection.errors {
            result.add_error(err.to_string());
        }
    }

    for warning in report.warnings() {
        result.add_warning(warning);
    }

    Ok(())
}

/// Check configuration values for common issues.
fn check_config_values(config: &Config, result: &mut ValidationResult) {
    if config.site.ends_with('/') {
        result.add_warning("site should not have a trailing slash");
    }

    if config.collections.is_empty() {
        result.add_warning("no collections are defined");
    }

    let data_store = config.resolve(&config.build.data_store);
    if data_store.is_dir() {
        result.add_error(format!(
            "build.data_store points at a directory: {}",
            data_store.display()
        ));
    }
}
