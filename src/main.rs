//! # Advocate Directory CLI (`advdir`)
//!
//! ## Usage
//!
//! ```bash
//! advdir --config ./config/advdir.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `advdir init` | Create the SQLite database and search index |
//! | `advdir seed` | Insert the bootstrap dataset |
//! | `advdir search [TEXT]` | Print one page of matching advocates |
//! | `advdir serve` | Start the HTTP API |
//! | `advdir browse` | Interactive table client for a running server |

use advocate_directory::{browse, config, db, migrate, search, seed, server};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Advocate Directory: search, sort, and page through advocates.
#[derive(Parser)]
#[command(name = "advdir", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/advdir.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema and search index. Idempotent.
    Init,

    /// Insert the bootstrap dataset (appends on every run).
    Seed,

    /// Search the directory and print one page.
    Search {
        /// Free-text search over first name, last name, and city.
        /// Omit to list everyone.
        text: Option<String>,

        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Rows per page. Defaults to the first configured page size.
        #[arg(long)]
        page_size: Option<u32>,

        /// Row order: `id` or `relevance`.
        #[arg(long, default_value = "id")]
        order_by: String,
    },

    /// Start the HTTP API on `[server].bind`.
    Serve,

    /// Browse a running server interactively.
    Browse {
        /// Server base URL. Defaults to `[client].base_url`.
        #[arg(long)]
        url: Option<String>,
    },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(match cli.command {
        Commands::Serve => "info",
        _ => "warn",
    });

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let pool = db::connect(&cfg).await?;
            migrate::run_migrations(&pool).await?;
            pool.close().await;
            println!("Database initialized successfully.");
        }
        Commands::Seed => {
            let pool = db::connect(&cfg).await?;
            migrate::run_migrations(&pool).await?;
            let inserted = seed::run_seed(&pool).await?;
            pool.close().await;
            println!("Seeded {} advocates.", inserted.len());
        }
        Commands::Search {
            text,
            page,
            page_size,
            order_by,
        } => {
            search::run_search(&cfg, text.as_deref(), page, page_size, &order_by).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Browse { url } => {
            browse::run_browse(&cfg, url).await?;
        }
    }

    Ok(())
}
