//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Inspect and author the posts and pages of a Markdown blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new post or page
    New {
        /// Layout to use (post, page, draft)
        #[arg(short, long)]
        layout: Option<String>,

        /// Title of the new post
        title: String,

        /// File name (without extension) for the new post
        #[arg(short, long)]
        path: Option<String>,
    },

    /// List site content
    #[command(alias = "ls")]
    List {
        /// Type of content to list (post, page, tag, category)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Export all documents as a JSON manifest
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the author profile
    Profile,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    if let Commands::Version = cli.command {
        println!("folio version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let folio = folio::Folio::new(&base_dir)?;
    folio::config::author::install(folio.config.author.clone())?;

    match cli.command {
        Commands::New {
            layout,
            title,
            path,
        } => {
            let layout = layout.unwrap_or_else(|| folio.config.default_layout.clone());
            tracing::info!("Creating new {} with title: {}", layout, title);
            let created =
                folio::commands::new::create_post(&folio, &title, &layout, path.as_deref())?;
            println!("Created: {:?}", created);
        }

        Commands::List { r#type } => {
            folio::commands::list::run(&folio, &r#type)?;
        }

        Commands::Export { output } => {
            folio::commands::export::run(&folio, output.as_deref())?;
        }

        Commands::Profile => {
            folio::commands::profile::run(&folio)?;
        }

        Commands::Version => {}
    }

    Ok(())
}
