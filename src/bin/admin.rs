//! CLI administration tool for shorten.
//!
//! Inspects the URL registry, derives and resolves keys, and repairs
//! records left without keys, all without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # View registry counters
//! cargo run --bin admin -- stats
//!
//! # Compute the key a record would get
//! cargo run --bin admin -- keys derive 42 https://www.rust-lang.org/
//!
//! # Look up a key
//! cargo run --bin admin -- keys resolve 3nvu
//!
//! # Key every pending record
//! cargo run --bin admin -- keys repair --limit 500
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `SHORTEN_POSTGRES` (or `DATABASE_URL`), the key
//! policy, and the `DB_*` pool settings.

use shorten::application::services::{ShortenService, derive_key_for};
use shorten::config::{self, Config};
use shorten::infrastructure::database;
use shorten::infrastructure::persistence::PgUrlRepository;
use shorten::utils::url_normalizer::normalize_url;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shorten.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Key derivation, lookup and repair
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },

    /// Show registry counters
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Key subcommands.
#[derive(Subcommand)]
enum KeysAction {
    /// Print the auto key for a record id and URL (no database access)
    Derive {
        /// Record id
        id: i64,

        /// Long URL, normalized before derivation
        url: String,
    },

    /// Print the URL a key resolves to
    Resolve {
        /// Auto key or custom key
        key: String,
    },

    /// Show a stored record
    Show {
        /// Record id
        id: i64,
    },

    /// Assign keys to records left pending by interrupted writes
    Repair {
        /// Maximum number of records to process
        #[arg(short, long, default_value_t = 1000)]
        limit: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Derivation is pure; everything else needs the database.
    if let Commands::Keys {
        action: KeysAction::Derive { id, url },
    } = &cli.command
    {
        return derive(*id, url);
    }

    let config = config::load_from_env()?;
    let pool = database::connect(&config).await?;

    match cli.command {
        Commands::Keys { action } => handle_keys_action(action, &config, pool).await?,
        Commands::Stats => handle_stats(&config, pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn service(config: &Config, pool: PgPool) -> ShortenService {
    let repository = Arc::new(PgUrlRepository::new(Arc::new(pool)));
    ShortenService::new(repository, config.key_policy, config.conflict_retries)
}

fn derive(id: i64, url: &str) -> Result<()> {
    let normalized = normalize_url(url).context("URL not supported")?;
    let key = derive_key_for(id, &normalized).map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("  URL: {}", normalized.cyan());
    println!("  ID:  {}", id.to_string().bright_black());
    println!("  Key: {}", key.bright_yellow().bold());

    Ok(())
}

/// Dispatches key commands that need storage.
async fn handle_keys_action(action: KeysAction, config: &Config, pool: PgPool) -> Result<()> {
    let service = service(config, pool);

    match action {
        KeysAction::Derive { id, url } => derive(id, &url)?,
        KeysAction::Resolve { key } => {
            let url = service
                .resolve_key(&key)
                .await
                .map_err(|e| anyhow::anyhow!("{}: {}", key, e))?;
            println!("  {} → {}", key.bright_yellow(), url.cyan());
        }
        KeysAction::Show { id } => show_record(&service, id).await?,
        KeysAction::Repair { limit, yes } => repair(&service, limit, yes).await?,
    }

    Ok(())
}

/// Prints every column of one record.
async fn show_record(service: &ShortenService, id: i64) -> Result<()> {
    let record = service
        .get_record(id)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    println!("  ID:         {}", record.id.to_string().bright_black());
    println!("  URL:        {}", record.url.cyan());
    println!("  Auto key:   {}", or_dash(&record.auto_key).bright_yellow());
    println!("  Custom key: {}", or_dash(&record.custom_key).bright_yellow());
    println!("  State:      {:?}", record.state());
    println!(
        "  Created:    {}",
        record.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
    );

    Ok(())
}

/// Keys pending records after confirmation.
///
/// # Flow
///
/// 1. Count pending records
/// 2. Confirm (unless `--yes` flag)
/// 3. Derive and assign keys for up to `limit` records
/// 4. Report how many were keyed
async fn repair(service: &ShortenService, limit: i64, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔧 Repair Pending Records".bright_blue().bold());
    println!();

    let stats = service
        .registry_stats()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read stats: {}", e))?;

    if stats.pending == 0 {
        println!("{}", "✅ Nothing to repair".green());
        return Ok(());
    }

    println!(
        "  Pending records: {} (processing up to {})",
        stats.pending.to_string().bright_yellow().bold(),
        limit
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Assign keys now?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let repaired = service
        .repair_pending(limit)
        .await
        .map_err(|e| anyhow::anyhow!("Repair failed: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Keyed records:".green().bold(),
        repaired.to_string().bright_white().bold()
    );
    if (repaired as i64) < stats.pending.min(limit) {
        println!(
            "{}",
            "⚠️  Some records could not be keyed, see logs".yellow()
        );
    }
    println!();

    Ok(())
}

/// Displays registry counters.
async fn handle_stats(config: &Config, pool: PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let stats = service(config, pool)
        .registry_stats()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read stats: {}", e))?;

    println!(
        "  URLs:    {}",
        stats.total.to_string().bright_green().bold()
    );
    println!(
        "  Keyed:   {}",
        (stats.total - stats.pending).to_string().bright_green().bold()
    );
    println!(
        "  Pending: {}",
        if stats.pending == 0 {
            stats.pending.to_string().bright_green().bold()
        } else {
            stats.pending.to_string().yellow().bold()
        }
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let table_size: Option<String> =
                sqlx::query_scalar("SELECT pg_size_pretty(pg_total_relation_size(to_regclass('urls')))")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  urls table: {}",
                table_size
                    .unwrap_or_else(|| "not created yet".to_string())
                    .bright_white()
            );
            println!();
        }
    }

    Ok(())
}
