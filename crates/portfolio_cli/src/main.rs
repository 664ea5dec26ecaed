//! Portfolio CLI - command-line interface for the portfolio backend.

mod commands;
mod config;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::Term;
use portfolio::sync::ReconcilePolicy;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portfolio")]
#[command(version)]
#[command(about = "Backend for a personal portfolio site")]
#[command(
    long_about = "Portfolio keeps the site's database in shape: it syncs public GitHub \
repositories into the projects table, imports the JSON fixture tree, backfills GitHub \
metadata and serves the tables over a small HTTP API."
)]
#[command(after_long_help = r#"EXAMPLES
    Create the schema:
        $ portfolio migrate up

    Sync public repositories of a user:
        $ portfolio sync octocat

    Only add repositories that are not tracked yet:
        $ portfolio sync octocat --policy insert-only

    Load the fixture tree:
        $ portfolio import ../old_jsons/data

    Serve the API:
        $ portfolio serve --addr 0.0.0.0:3000

CONFIGURATION
    Portfolio reads configuration from:
      1. ~/.config/portfolio/config.toml (or $XDG_CONFIG_HOME/portfolio/config.toml)
      2. ./portfolio.toml
      3. Environment variables (PORTFOLIO_* prefix, e.g., PORTFOLIO_DATABASE_URL)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    SUPABASE_DATABASE_URL     Database connection string (or DATABASE_URL)
    GITHUB_TOKEN              GitHub personal access token (required for backfill)
    GITHUB_USERNAME           Account synced when no <username> is given
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Sync a user's public GitHub repositories into the projects table
    Sync {
        /// GitHub username (default from GITHUB_USERNAME or config)
        username: Option<String>,

        /// How to treat repositories that already have a project row (default from config or upsert)
        #[arg(short, long)]
        policy: Option<ReconcilePolicy>,
    },
    /// Fill missing github_raw metadata for projects with a GitHub repository URL
    Backfill,
    /// Replace the content tables with the JSON fixture tree
    Import {
        /// Fixture directory
        #[arg(default_value = portfolio::import::DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
    /// Serve the HTTP API
    Serve {
        /// Listen address (default from config or 127.0.0.1:3000)
        #[arg(short, long)]
        addr: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Interactive runs print summaries themselves; keep the log to warnings.
    let default_filter = if Term::stdout().is_term() {
        "portfolio=warn,portfolio_cli=warn"
    } else {
        "portfolio=info,portfolio_cli=info"
    };
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(default_filter),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration (config file -> env vars -> defaults)
    let config = config::Config::load();

    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            commands::meta::handle_completions(shell)?;
        }
        Commands::Migrate { action } => {
            commands::migrate::handle_migrate(action, &config).await?;
        }
        Commands::Sync { username, policy } => {
            commands::sync::handle_sync(username.as_deref(), policy, &config).await?;
        }
        Commands::Backfill => {
            commands::backfill::handle_backfill(&config).await?;
        }
        Commands::Import { data_dir } => {
            commands::import::handle_import(&data_dir, &config).await?;
        }
        Commands::Serve { addr } => {
            commands::serve::handle_serve(addr.as_deref(), &config).await?;
        }
    }

    Ok(())
}
