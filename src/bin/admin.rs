//! CLI administration tool for linkhop.
//!
//! Manages links straight against PostgreSQL, without going through the
//! HTTP authoring API.
//!
//! # Usage
//!
//! ```bash
//! # Create a link
//! cargo run --bin admin -- link create --slug promo --url https://example.com/x
//!
//! # List links
//! cargo run --bin admin -- link list --category spring
//!
//! # Show or delete a link by slug or id
//! cargo run --bin admin -- link show promo
//! cargo run --bin admin -- link delete promo
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME` (required)

use linkhop::application::services::LinkService;
use linkhop::config::{Config, mask_connection_string};
use linkhop::domain::entities::{Link, LinkFields, RedirectKind, Target};
use linkhop::domain::errors::StoreError;
use linkhop::infrastructure::persistence::PgLinkRepository;
use linkhop::server::connect_database;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

type PgLinkService = LinkService<PgLinkRepository>;

/// CLI tool for managing linkhop.
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
    /// Manage short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a new link
    Create {
        /// Slug used in /go/{slug}
        #[arg(short, long)]
        slug: String,

        /// Target URL (http or https)
        #[arg(short, long)]
        url: String,

        /// permanent, temporary, temporary-strict (default) or permanent-strict
        #[arg(short = 'r', long)]
        redirect_type: Option<RedirectKind>,

        /// Human readable title
        #[arg(short, long)]
        title: Option<String>,

        /// Expiry, RFC 3339 or YYYY-MM-DDTHH:MM (UTC)
        #[arg(short, long)]
        expires_at: Option<String>,

        /// Category name (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// Mark the link nofollow
        #[arg(long)]
        no_follow: bool,

        /// Mark the link sponsored
        #[arg(long)]
        sponsored: bool,

        /// Do not send click events for this link
        #[arg(long)]
        no_track: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List active links, newest first
    List {
        #[arg(long, default_value_t = 1)]
        page: i64,

        #[arg(long, default_value_t = 50)]
        page_size: i64,

        /// Only links in this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show one link
    Show {
        /// Slug or numeric id
        slug_or_id: String,
    },

    /// Soft-delete a link
    Delete {
        /// Slug or numeric id
        slug_or_id: String,

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
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL (or DB_NAME and credentials) must be set")?;

    let pool = connect_database(&config, &database_url).await?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &database_url).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let service = LinkService::new(repo);

    match action {
        LinkAction::Create {
            slug,
            url,
            redirect_type,
            title,
            expires_at,
            categories,
            no_follow,
            sponsored,
            no_track,
            yes,
        } => {
            let fields = LinkFields {
                slug,
                title,
                target_url: Some(url),
                rotation: None,
                redirect_kind: redirect_type,
                no_follow,
                sponsored,
                track_enabled: Some(!no_track),
                categories,
                expires_at,
            };
            create_link(&service, fields, yes).await?;
        }
        LinkAction::List {
            page,
            page_size,
            category,
        } => list_links(&service, page, page_size, category).await?,
        LinkAction::Show { slug_or_id } => {
            let link = find_link(&service, &slug_or_id).await?;
            print_link(&link);
        }
        LinkAction::Delete { slug_or_id, yes } => {
            delete_link(&service, &slug_or_id, yes).await?;
        }
    }

    Ok(())
}

/// Creates a link after showing its details.
async fn create_link(service: &PgLinkService, fields: LinkFields, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔗 Create Link".bright_blue().bold());
    println!();
    println!("  Slug:   {}", fields.slug.cyan());
    if let Some(url) = &fields.target_url {
        println!("  Target: {}", url.bright_white());
    }
    println!(
        "  Type:   {}",
        fields.redirect_kind.unwrap_or_default().to_string().bright_black()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this link?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let link = service
        .create(fields)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!();
    println!("{}", "✅ Link created successfully!".green().bold());
    println!();
    print_link(&link);

    Ok(())
}

/// Lists links as a table.
///
/// # Output Format
///
/// ```text
/// 📋 Links
///
///   ID    Slug                 Status  Target
///   ──────────────────────────────────────────────────────────────
///   12    promo                307     https://example.com/x
///   11    spring-ab            302     rotation (2 variants)
/// ```
async fn list_links(
    service: &PgLinkService,
    page: i64,
    page_size: i64,
    category: Option<String>,
) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    let (links, total) = service
        .list(page.max(1), page_size.clamp(1, 500), category)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        println!(
            "  Create one with: {} admin link create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<20} {:<7} {}",
        "ID".bright_white().bold(),
        "Slug".bright_white().bold(),
        "Status".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    let now = Utc::now();
    for link in &links {
        let status = if link.is_expired_at(now) {
            "expired".red()
        } else {
            link.redirect_kind.status_code().to_string().green()
        };

        println!(
            "  {:<5} {:<20} {:<7} {}",
            link.id.to_string().bright_black(),
            link.slug.cyan(),
            status,
            target_summary(&link.target)
        );
    }

    println!();
    println!("  Total: {}", total.to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Looks up a link by numeric id first, then by slug.
async fn find_link(service: &PgLinkService, slug_or_id: &str) -> Result<Link> {
    let by_id = match slug_or_id.parse::<i64>() {
        Ok(id) => match service.get(id).await {
            Ok(link) => Some(link),
            Err(StoreError::NotFound) => None,
            Err(e) => return Err(anyhow::anyhow!("Database error: {}", e)),
        },
        Err(_) => None,
    };

    if let Some(link) = by_id {
        return Ok(link);
    }

    match service.get_by_slug(slug_or_id).await {
        Ok(link) => Ok(link),
        Err(StoreError::NotFound) => anyhow::bail!("Link '{}' not found", slug_or_id),
        Err(e) => Err(anyhow::anyhow!("Database error: {}", e)),
    }
}

/// Soft-deletes a link with confirmation prompt (default: No).
async fn delete_link(service: &PgLinkService, slug_or_id: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete Link".bright_blue().bold());
    println!();

    let link = find_link(service, slug_or_id).await?;

    println!("  Slug: {}", link.slug.cyan());
    println!("  ID:   {}", link.id.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete(link.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!();
    println!("{}", "✅ Link deleted, slug is free again".green().bold());
    println!();

    Ok(())
}

fn target_summary(target: &Target) -> String {
    match target {
        Target::Single(url) => url.clone(),
        Target::Rotation(variants) => format!("rotation ({} variants)", variants.len()),
    }
}

fn print_link(link: &Link) {
    println!("  {:<12} {}", "ID:".bright_white(), link.id);
    println!("  {:<12} {}", "Slug:".bright_white(), link.slug.cyan());
    if let Some(title) = &link.title {
        println!("  {:<12} {}", "Title:".bright_white(), title);
    }
    match &link.target {
        Target::Single(url) => println!("  {:<12} {}", "Target:".bright_white(), url),
        Target::Rotation(variants) => {
            println!("  {:<12}", "Rotation:".bright_white());
            for v in variants {
                println!("    {:>6}  {}", v.weight.to_string().bright_black(), v.url);
            }
        }
    }
    println!(
        "  {:<12} {} ({})",
        "Redirect:".bright_white(),
        link.redirect_kind,
        link.redirect_kind.status_code()
    );
    println!(
        "  {:<12} nofollow={} sponsored={} tracked={}",
        "Attributes:".bright_white(),
        link.attributes.no_follow,
        link.attributes.sponsored,
        link.attributes.track_enabled
    );
    if !link.categories.is_empty() {
        println!(
            "  {:<12} {}",
            "Categories:".bright_white(),
            link.categories.join(", ")
        );
    }
    if let Some(expires_at) = link.expires_at {
        let label = if link.is_expired_at(Utc::now()) {
            "expired".red()
        } else {
            "active".green()
        };
        println!(
            "  {:<12} {} {}",
            "Expires:".bright_white(),
            expires_at.format("%Y-%m-%d %H:%M UTC"),
            label
        );
    }
    println!(
        "  {:<12} {}",
        "Created:".bright_white(),
        link.created_at.format("%Y-%m-%d %H:%M")
    );
    println!();
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool, database_url: &str) -> Result<()> {
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
            let links: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE deleted_at IS NULL")
                    .fetch_one(pool)
                    .await?;

            println!("  URL:          {}", mask_connection_string(database_url));
            println!("  PostgreSQL:   {}", version.bright_white());
            println!("  Active links: {}", links.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}
