//! Info command - print the resolved site configuration

use std::path::Path;

use blogsmith_core::{Config, Plugin};
use color_eyre::eyre::{Result, WrapErr};

/// Run the info command.
pub fn run(config_path: &Path) -> Result<()> {
    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    print!("{}", describe(&config));
    Ok(())
}

fn describe(config: &Config) -> String {
    let mut out = String::new();
    out.push_str(&format!("Site:         {}\n", config.site));
    out.push_str(&format!("Adapter:      {}\n", config.adapter));
    out.push_str(&format!("Integrations: {}\n", names(&config.integrations)));
    out.push_str(&format!("Vite plugins: {}\n", names(&config.vite.plugins)));
    out.push_str(&format!(
        "Remark:       {}\n",
        names(&config.markdown.remark_plugins)
    ));
    out.push_str(&format!(
        "Data store:   {}\n",
        config.resolve(&config.build.data_store).display()
    ));

    out.push_str("\nCollections:\n");
    for (name, collection) in &config.collections {
        out.push_str(&format!(
            "  {name}: {} under {}\n",
            collection.loader.pattern,
            collection.loader.base.display()
        ));
        for (field, spec) in &collection.schema.fields {
            let marker = if spec.optional { "?" } else { "" };
            out.push_str(&format!("    {field}{marker}: {}\n", spec.ty));
        }
    }
    out
}

fn names(plugins: &[Plugin]) -> String {
    if plugins.is_empty() {
        return "(none)".to_string();
    }
    plugins
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
