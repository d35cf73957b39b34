//! CLI administration tool for snaplink.
//!
//! Inspects and deletes short URLs and reports usage without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show a record by code or alias
//! cargo run --bin admin -- link show promo2024
//!
//! # Show a record by numeric id
//! cargo run --bin admin -- link show --id 42
//!
//! # Delete a record (and evict it from Redis when configured)
//! cargo run --bin admin -- link delete promo2024
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`snaplink::config`]. `DATABASE_URL` (or the
//! `DB_*` components) is required, `REDIS_URL` is optional.

use snaplink::application::services::{ShortenerSettings, UrlService};
use snaplink::config::{self, Config};
use snaplink::domain::entities::UrlRecord;
use snaplink::error::AppError;
use snaplink::infrastructure::cache::{CacheService, NullCache, RedisCache};
use snaplink::infrastructure::persistence::PgUrlRepository;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Number of entries in the `stats` leaderboard.
const TOP_LINKS: i64 = 5;

/// CLI tool for managing snaplink.
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
    /// Inspect or delete short URLs
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Show a stored record
    Show {
        /// Short code or custom alias
        #[arg(required_unless_present = "id", conflicts_with = "id")]
        code: Option<String>,

        /// Numeric record id
        #[arg(long)]
        id: Option<i64>,
    },

    /// Delete a short URL
    Delete {
        /// Short code or custom alias
        code: String,

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
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &config, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Builds a [`UrlService`] over the configured store and cache.
///
/// The click channel is never read; the admin tool does not resolve codes.
async fn build_service(config: &Config, pool: &PgPool) -> UrlService {
    let cache: Arc<dyn CacheService> = match &config.redis_url {
        Some(redis_url) => match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => Arc::new(redis),
            Err(e) => {
                println!(
                    "{}",
                    format!("⚠️  Redis unavailable ({e}), cache entries will not be evicted")
                        .yellow()
                );
                Arc::new(NullCache::new())
            }
        },
        None => Arc::new(NullCache::new()),
    };

    let (click_tx, _click_rx) = mpsc::channel(1);
    let settings = ShortenerSettings {
        code_length: config.short_code_length,
        base_url: config.base_url.clone(),
        cache_ttl_seconds: config.cache_ttl_seconds,
    };

    UrlService::new(
        Arc::new(PgUrlRepository::new(Arc::new(pool.clone()))),
        cache,
        click_tx,
        settings,
    )
}

/// Dispatches link commands.
async fn handle_link_action(action: LinkAction, config: &Config, pool: &PgPool) -> Result<()> {
    let service = build_service(config, pool).await;

    match action {
        LinkAction::Show { code, id } => show_link(&service, code, id).await,
        LinkAction::Delete { code, yes } => delete_link(&service, &code, yes).await,
    }
}

/// Prints a single record.
///
/// # Output Format
///
/// ```text
/// 🔗 Short URL
///
///   ID:        42
///   Short URL: http://localhost:3000/promo2024
///   Target:    https://example.com/a/b
///   Clicks:    17
///   Created:   2026-01-15 10:30
///   Expires:   never
/// ```
async fn show_link(service: &UrlService, code: Option<String>, id: Option<i64>) -> Result<()> {
    let lookup = match (id, code) {
        (Some(id), _) => service.get_by_id(id).await,
        (None, Some(code)) => service.get_by_code(&code).await,
        (None, None) => bail!("Either a code or --id is required"),
    };

    let record = match lookup {
        Ok(record) => record,
        Err(AppError::NotFound { .. }) => {
            println!("{}", "❌ Short URL not found".red());
            return Ok(());
        }
        Err(e) => return Err(anyhow::anyhow!("Database error: {}", e)),
    };

    println!("{}", "🔗 Short URL".bright_blue().bold());
    println!();
    print_record(service, &record);
    println!();

    Ok(())
}

fn print_record(service: &UrlService, record: &UrlRecord) {
    println!("  ID:        {}", record.id.to_string().bright_black());
    println!(
        "  Short URL: {}",
        service.short_url(&record.short_code).cyan()
    );
    if let Some(alias) = &record.custom_alias {
        println!("  Alias:     {}", alias.cyan());
    }
    println!("  Target:    {}", record.original_url.bright_white());
    println!(
        "  Clicks:    {}",
        record.clicks.to_string().bright_green().bold()
    );
    println!(
        "  Created:   {}",
        record.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
    );

    let expires = match record.expires_at {
        Some(at) if record.is_expired() => format!("{} (expired)", at.format("%Y-%m-%d %H:%M"))
            .red()
            .to_string(),
        Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
        None => "never".bright_black().to_string(),
    };
    println!("  Expires:   {}", expires);
}

/// Deletes a record after confirmation (default: No).
async fn delete_link(service: &UrlService, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Short URL".bright_blue().bold());
    println!();

    let record = match service.get_by_code(code).await {
        Ok(record) => record,
        Err(AppError::NotFound { .. }) => {
            println!("{}", "❌ Short URL not found".red());
            return Ok(());
        }
        Err(e) => return Err(anyhow::anyhow!("Database error: {}", e)),
    };

    print_record(service, &record);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this short URL?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete short URL: {}", e))?;

    println!();
    println!("{}", "✅ Short URL deleted".green().bold());
    println!();

    Ok(())
}

/// Displays totals and the most clicked links.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let (links_count, clicks_count): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(clicks), 0)::BIGINT FROM urls")
            .fetch_one(pool)
            .await?;

    let expired_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM urls WHERE expires_at < created_at")
            .fetch_one(pool)
            .await?;

    println!(
        "  Links:   {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:  {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!(
        "  Expired: {}",
        expired_count.to_string().bright_green().bold()
    );
    println!();

    let top: Vec<(String, String, i64)> = sqlx::query_as(
        "SELECT short_code, original_url, clicks FROM urls ORDER BY clicks DESC, id ASC LIMIT $1",
    )
    .bind(TOP_LINKS)
    .fetch_all(pool)
    .await?;

    if top.is_empty() {
        println!("{}", "  No links yet".yellow());
        println!();
        return Ok(());
    }

    println!("{}", "Top links:".bright_white().bold());
    println!(
        "  {:<12} {:>8}  {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for (code, original_url, clicks) in &top {
        println!(
            "  {:<12} {:>8}  {}",
            code.cyan(),
            clicks.to_string().bright_green(),
            original_url.bright_black()
        );
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}
