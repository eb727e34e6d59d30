//! CLI administration tool for redis-url-shortener.
//!
//! Inspects and repairs store state without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show where a short code points and when it expires
//! cargo run --bin admin -- link show abc123
//!
//! # Show a client's remaining quota
//! cargo run --bin admin -- quota show 203.0.113.7
//!
//! # Reset a client's quota window
//! cargo run --bin admin -- quota reset 203.0.113.7
//!
//! # Global redirect counter
//! cargo run --bin admin -- stats
//!
//! # Check both store namespaces
//! cargo run --bin admin -- store check
//! ```
//!
//! # Environment Variables
//!
//! - `REDIS_URL` or `REDIS_HOST` / `REDIS_PORT` / `REDIS_PASSWORD` (required)
//! - `REDIS_LINKS_DB` / `REDIS_QUOTA_DB` (default: 0 / 1)
//! - `API_QUOTA` / `QUOTA_WINDOW_SECS` (default: 10 / 1800)

use redis_url_shortener::application::services::{RateLimiter, ResolveService};
use redis_url_shortener::config::{
    Config, DEFAULT_API_QUOTA, DEFAULT_LINKS_DB, DEFAULT_QUOTA_DB, DEFAULT_QUOTA_WINDOW_SECS,
    env_parse,
};
use redis_url_shortener::domain::repositories::{KeyTtl, KeyValueStore};
use redis_url_shortener::infrastructure::store::RedisStore;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;
use std::time::Duration;

const POOL_SIZE: usize = 2;
const POOL_TIMEOUT: Duration = Duration::from_secs(5);

/// CLI tool for managing redis-url-shortener.
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
    /// Inspect short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Inspect or reset client quotas
    Quota {
        #[command(subcommand)]
        action: QuotaAction,
    },

    /// Show the global redirect counter
    Stats,

    /// Store operations
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Show the target and remaining lifetime of a short code
    Show { code: String },
}

#[derive(Subcommand)]
enum QuotaAction {
    /// Show a client's remaining quota
    Show {
        /// Client key (IP address)
        client: String,
    },

    /// Delete a client's quota counter; the next request opens a fresh window
    Reset {
        /// Client key (IP address)
        client: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Ping the links and quota databases
    Check,
}

/// Both namespaces plus the services built over them.
struct Admin {
    links: Arc<RedisStore>,
    quotas: Arc<RedisStore>,
    rate_limiter: RateLimiter,
    resolver: ResolveService,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let admin = connect().await?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &admin).await?,
        Commands::Quota { action } => handle_quota_action(action, &admin).await?,
        Commands::Stats => handle_stats(&admin).await?,
        Commands::Store { action } => handle_store_action(action, &admin).await?,
    }

    Ok(())
}

async fn connect() -> Result<Admin> {
    let url = Config::load_redis_url().context("REDIS_URL or REDIS_HOST must be set")?;
    let links_db = env_parse("REDIS_LINKS_DB", DEFAULT_LINKS_DB)?;
    let quota_db = env_parse("REDIS_QUOTA_DB", DEFAULT_QUOTA_DB)?;
    let quota = env_parse("API_QUOTA", DEFAULT_API_QUOTA)?;
    let window = env_parse("QUOTA_WINDOW_SECS", DEFAULT_QUOTA_WINDOW_SECS)?;

    let links = Arc::new(
        RedisStore::connect(&url, links_db, POOL_SIZE, POOL_TIMEOUT, "links")
            .await
            .context("Failed to connect to links database")?,
    );
    let quotas = Arc::new(
        RedisStore::connect(&url, quota_db, POOL_SIZE, POOL_TIMEOUT, "quota")
            .await
            .context("Failed to connect to quota database")?,
    );

    Ok(Admin {
        rate_limiter: RateLimiter::new(quotas.clone(), quota, Duration::from_secs(window)),
        resolver: ResolveService::new(links.clone()),
        links,
        quotas,
    })
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

async fn handle_link_action(action: LinkAction, admin: &Admin) -> Result<()> {
    let LinkAction::Show { code } = action;

    println!("{}", "🔗 Short Link".bright_blue().bold());
    println!();

    let Some(target) = admin.links.get(&code).await? else {
        println!("  {}", format!("No live link for '{code}'").yellow());
        return Ok(());
    };

    let expires = match admin.links.ttl(&code).await? {
        KeyTtl::Expires(left) => format!("in {}", format_duration(left)),
        KeyTtl::Persistent => "never".to_string(),
        KeyTtl::Missing => "already expired".to_string(),
    };

    println!("  Code:    {}", code.cyan());
    println!("  Target:  {}", target.bright_white());
    println!("  Expires: {}", expires.bright_black());
    println!();

    Ok(())
}

/// Shows or resets a client's quota.
///
/// Reset requires confirmation (default: No) unless `--yes` is given.
async fn handle_quota_action(action: QuotaAction, admin: &Admin) -> Result<()> {
    match action {
        QuotaAction::Show { client } => {
            println!("{}", "⏱  Client Quota".bright_blue().bold());
            println!();

            match admin.rate_limiter.snapshot(&client).await? {
                Some(snapshot) => {
                    let remaining = if snapshot.remaining > 0 {
                        snapshot.remaining.to_string().green()
                    } else {
                        snapshot.remaining.to_string().red()
                    };
                    println!("  Client:    {}", client.cyan());
                    println!(
                        "  Remaining: {} of {}",
                        remaining.bold(),
                        admin.rate_limiter.quota()
                    );
                    println!(
                        "  Resets in: {}",
                        format_duration(snapshot.reset_after).bright_black()
                    );
                }
                None => {
                    println!(
                        "  {} has no open window (full quota of {})",
                        client.cyan(),
                        admin.rate_limiter.quota()
                    );
                }
            }
            println!();
        }
        QuotaAction::Reset { client, yes } => {
            println!("{}", "♻  Reset Client Quota".bright_blue().bold());
            println!();
            println!("  Client: {}", client.cyan());
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Reset this client's quota window?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            if admin.rate_limiter.reset(&client).await? {
                println!("{}", "✅ Quota window reset".green().bold());
            } else {
                println!("{}", "⚠️  Client had no open window".yellow());
            }
            println!();
        }
    }

    Ok(())
}

async fn handle_stats(admin: &Admin) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let hits = admin
        .resolver
        .hit_count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read hit counter: {}", e))?;

    println!(
        "  Redirects served: {}",
        hits.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

async fn handle_store_action(action: StoreAction, admin: &Admin) -> Result<()> {
    match action {
        StoreAction::Check => {
            println!("{}", "🔍 Checking store connections...".bright_blue());

            let mut healthy = true;
            for (name, store) in [("links", &admin.links), ("quota", &admin.quotas)] {
                if store.ping().await {
                    println!("  {} {}", "✅".green(), name);
                } else {
                    println!("  {} {}", "❌".red(), name);
                    healthy = false;
                }
            }

            if !healthy {
                anyhow::bail!("One or more store namespaces are unreachable");
            }
            println!("{}", "✅ Store connections OK".green().bold());
        }
    }

    Ok(())
}
