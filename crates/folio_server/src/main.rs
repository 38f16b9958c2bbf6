//! Folio CLI
//!
//! Serve the portfolio site and inspect its link previews.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use folio_server::meta::{self, PreviewMeta};
use folio_server::{FolioConfig, CONFIG_FILE};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Folio portfolio site server", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the site and API
    Serve {
        /// Configuration file
        #[arg(short, long, default_value = CONFIG_FILE)]
        config: PathBuf,

        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the configured static directory
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Print the app shell as served for a path
    Meta {
        /// Request path, e.g. /work/atlas
        path: String,

        /// Configuration file
        #[arg(short, long, default_value = CONFIG_FILE)]
        config: PathBuf,
    },

    /// Show version and configured pages
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Serve { config, port, dir } => cmd_serve(config, port, dir).await,
        Commands::Meta { path, config } => cmd_meta(&path, config),
        Commands::Info => cmd_info(),
    }
}

async fn cmd_serve(path: PathBuf, port: Option<u16>, dir: Option<PathBuf>) -> Result<()> {
    let mut config = FolioConfig::load(&path)?;
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(dir) = dir {
        config.server.static_dir = dir;
    }
    folio_server::serve(config).await
}

fn cmd_meta(request_path: &str, path: PathBuf) -> Result<()> {
    let config = FolioConfig::load(&path)?;
    let index = config.server.static_dir.join(&config.server.index);
    let shell = std::fs::read_to_string(&index)
        .with_context(|| format!("Failed to read {}", index.display()))?;

    let Some(page) = config.page_for_path(request_path) else {
        anyhow::bail!(
            "No page configured for '{}'. Known slugs: {:?}",
            request_path,
            config.pages.iter().map(|p| p.slug.as_str()).collect::<Vec<_>>()
        );
    };

    println!("{}", meta::rewrite(&shell, &PreviewMeta::for_page(page, &config.site)));
    Ok(())
}

fn cmd_info() -> Result<()> {
    println!("Folio");
    println!("=====");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Endpoints:");
    println!("  - POST /api/contact");
    println!("  - GET  /api/thoughts");
    println!("  - GET  /*  (static files, app shell fallback)");
    println!();

    let config = FolioConfig::load(&PathBuf::from(CONFIG_FILE))?;
    println!("Config: {}", CONFIG_FILE);
    println!("  Address:    {}", config.bind_address());
    println!("  Static dir: {}", config.server.static_dir.display());
    println!(
        "  Thoughts:   {}",
        config.thoughts.url.as_deref().unwrap_or("(not configured)")
    );
    println!("  Pages:      {}", config.pages.len());
    for page in &config.pages {
        println!("    /{} - {}", page.slug.trim_matches('/'), page.title);
    }

    Ok(())
}
