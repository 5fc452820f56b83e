//! CLI entry point for folio-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio-rs")]
#[command(version)]
#[command(about = "Content loader for a Markdown/MDX portfolio and blog", long_about = None)]
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
    /// List site content
    #[command(alias = "ls")]
    List {
        /// Type of content to list (posts, projects, pages, tags, slugs)
        #[arg(default_value = "posts")]
        r#type: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show a single post, project or page
    Show {
        /// Type of content (post, project, page)
        r#type: String,

        /// Slug or page name
        id: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List every route the site can pre-render
    Routes {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Validate content frontmatter
    Check {
        /// Re-check whenever content changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
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

    match cli.command {
        Commands::List { r#type, json } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::list::run(&folio, &r#type, json)?;
        }

        Commands::Show { r#type, id, json } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::show::run(&folio, &r#type, &id, json).await?;
        }

        Commands::Routes { json } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::routes::run(&folio, json)?;
        }

        Commands::Check { watch } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            tracing::info!("Checking content in {:?}", folio.content_dir);
            folio_rs::commands::check::run(&folio, watch)?;
        }

        Commands::Version => {
            println!("folio-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
