use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use starboard::{CommandBackend, Config, Provider, RepoListStore};

#[derive(Parser)]
#[command(name = "starboard")]
#[command(about = "Track repository star counts through a backend process")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (defaults to XDG config location)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List tracked repositories with fresh star counts
    #[command(visible_alias = "refresh")]
    List,

    /// Track a new repository
    Add {
        /// Hosting service: github or gitlab
        provider: String,

        /// Repository owner
        owner: String,

        /// Repository name
        name: String,
    },

    /// Toggle the favourite flag of a tracked entry
    Favourite {
        /// Entry id as shown by `list`
        id: String,
    },

    /// Stop tracking an entry
    Remove {
        /// Entry id as shown by `list`
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;
    info!("Starting Starboard v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config(cli.config)?;

    // Connect the store to the backend process and perform the initial load
    let backend = Arc::new(
        CommandBackend::spawn(&config.backend.command, &config.backend.args)
            .context("Failed to start the backend process")?,
    );
    let store = RepoListStore::with_dismiss_after(backend, config.notice_timeout());
    store.load().await?;

    match cli.command {
        Commands::List => cmd_list(&store).await,
        Commands::Add {
            provider,
            owner,
            name,
        } => cmd_add(&store, &provider, &owner, &name).await,
        Commands::Favourite { id } => cmd_favourite(&store, &id).await,
        Commands::Remove { id } => cmd_remove(&store, &id).await,
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

/// Load configuration from specified path or default location
fn load_config(config_path: Option<std::path::PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(&path),
        None => Config::load_or_default(),
    }
}

/// Print the tracked repository list
async fn cmd_list(store: &RepoListStore) -> Result<()> {
    let entries = store.entries().await;

    if entries.is_empty() {
        println!("No tracked repositories. Add one with: starboard add github <owner> <name>");
        return Ok(());
    }

    println!("📋 Tracked repositories:");
    for entry in entries {
        let mark = if entry.setting.favourite { "♥" } else { " " };
        println!(
            "   {} {:6} {:<40} ★ {:>8}  {}",
            mark,
            entry.setting.repo.provider.as_str(),
            entry.setting.repo.to_string(),
            entry.stars,
            entry.setting.id
        );
    }

    Ok(())
}

/// Track a new repository
async fn cmd_add(store: &RepoListStore, provider: &str, owner: &str, name: &str) -> Result<()> {
    let provider = Provider::parse(provider)
        .with_context(|| format!("Unknown provider: {} (expected github or gitlab)", provider))?;

    match store.add(provider, owner, name).await? {
        Some(entry) => {
            println!(
                "✅ Now tracking {} ({} stars), id {}",
                entry.setting.repo, entry.stars, entry.setting.id
            );
        }
        None => {
            println!("Nothing added: owner and name must be non-empty");
        }
    }

    Ok(())
}

/// Toggle the favourite flag of an entry
async fn cmd_favourite(store: &RepoListStore, id: &str) -> Result<()> {
    store.toggle_favourite(id).await?;
    cmd_list(store).await
}

/// Stop tracking an entry
async fn cmd_remove(store: &RepoListStore, id: &str) -> Result<()> {
    store.delete(id).await?;
    cmd_list(store).await
}
