//! Blogsmith CLI
//!
//! Validates blog content against its collection schemas and writes the data
//! store page templates read from.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for blogsmith.
#[derive(Parser)]
#[command(
    name = "blogsmith",
    version,
    about = "Schema-checked content collections for a markdown blog"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "blogsmith.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Validate configuration and every document of every collection
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Load all collections and write the data store
    Sync {
        /// Data store path (defaults to build.data_store)
        #[arg(short, long)]
        out: Option<std::path::PathBuf>,
        /// Include draft entries
        #[arg(long)]
        drafts: bool,
    },
    /// Create a new document with front matter matching its collection schema
    New {
        /// Document name relative to the collection base (e.g., my-first-post)
        name: std::path::PathBuf,
        /// Collection to add the document to
        #[arg(short = 'C', long, default_value = "blog")]
        collection: String,
    },
    /// Show the resolved site configuration
    Info,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    blogsmith::init_tracing(cli.verbose);

    match cli.command {
        Commands::Check { strict } => {
            blogsmith::cmd::check::run(&cli.config, strict)?;
        }
        Commands::Sync { out, drafts } => {
            blogsmith::cmd::sync::run(&cli.config, out.as_deref(), drafts)?;
        }
        Commands::New { name, collection } => {
            blogsmith::cmd::new::run(&cli.config, &name, &collection)?;
        }
        Commands::Info => {
            blogsmith::cmd::info::run(&cli.config)?;
        }
    }

    Ok(())
}
