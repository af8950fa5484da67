//! CLI administration tool for ya-portal.
//!
//! Publishes and removes news, creates accounts, moderates comments and
//! inspects the database without going through the web pages.
//!
//! # Usage
//!
//! ```bash
//! # Publish a news item
//! cargo run --bin admin -- news create --title "Заголовок" --text "Текст"
//!
//! # List news
//! cargo run --bin admin -- news list
//!
//! # Create an account with a generated password
//! cargo run --bin admin -- user create alice
//!
//! # Remove a comment
//! cargo run --bin admin -- comment delete 42
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
//! Same as the server: `DATABASE_URL` (or `DB_*`) and `SESSION_SECRET`
//! are required. The in-memory backend is rejected since nothing would
//! outlive the command.

use ya_portal::config::{self, StorageBackend};
use ya_portal::server::{app_settings, build_repositories};
use ya_portal::state::AppState;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};

/// CLI tool for managing ya-portal.
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
    /// Manage news items
    News {
        #[command(subcommand)]
        action: NewsAction,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Moderate comments
    Comment {
        #[command(subcommand)]
        action: CommentAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum NewsAction {
    /// Publish a news item
    Create {
        #[arg(short, long)]
        title: Option<String>,

        #[arg(long)]
        text: Option<String>,

        /// Publication date (YYYY-MM-DD), today if omitted
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all news, newest first
    List,

    /// Delete a news item and its comments
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create an account
    Create {
        username: String,

        /// Password (generated if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List accounts
    List,
}

#[derive(Subcommand)]
enum CommentAction {
    /// Delete any comment by ID
    Delete {
        id: i64,

        #[arg(short = 'y', long)]
        yes: bool,
    },
}

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

    let config = config::load_from_env()?;
    if config.storage == StorageBackend::Memory {
        anyhow::bail!("The admin tool needs STORAGE=postgres");
    }

    let repositories = build_repositories(&config).await?;
    let state = AppState::new(repositories, app_settings(&config));

    match cli.command {
        Commands::News { action } => handle_news_action(action, &state).await?,
        Commands::User { action } => handle_user_action(action, &state).await?,
        Commands::Comment { action } => handle_comment_action(action, &state).await?,
        Commands::Stats => handle_stats(&state).await?,
        Commands::Db { action } => handle_db_action(action, &state).await?,
    }

    Ok(())
}

async fn handle_news_action(action: NewsAction, state: &AppState) -> Result<()> {
    match action {
        NewsAction::Create {
            title,
            text,
            date,
            yes,
        } => create_news(state, title, text, date, yes).await,
        NewsAction::List => list_news(state).await,
        NewsAction::Delete { id } => delete_news(state, id).await,
    }
}

/// Publishes a news item, prompting for missing fields.
async fn create_news(
    state: &AppState,
    title: Option<String>,
    text: Option<String>,
    date: Option<NaiveDate>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "📰 Publish News".bright_blue().bold());
    println!();

    let title = match title {
        Some(t) => t,
        None => Input::new().with_prompt("Title").interact_text()?,
    };
    let text = match text {
        Some(t) => t,
        None => Input::new().with_prompt("Text").interact_text()?,
    };

    println!("  Title: {}", title.cyan());
    println!(
        "  Date:  {}",
        date.map_or_else(|| "today".to_string(), |d| d.to_string())
            .bright_black()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Publish this news item?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let news = state
        .news_service
        .create_news(&title, &text, date)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create news: {}", e))?;

    println!(
        "{} {}",
        "✅ News published with ID".green().bold(),
        news.id.to_string().bright_white().bold()
    );
    Ok(())
}

/// Lists all news with their publication dates.
///
/// # Output Format
///
/// ```text
///   ID   Date         Title
///   ─────────────────────────────────────────
///   2    2024-01-16   Second
///   1    2024-01-15   First
/// ```
async fn list_news(state: &AppState) -> Result<()> {
    println!("{}", "📋 News".bright_blue().bold());
    println!();

    let news = state
        .news_service
        .list_news()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list news: {}", e))?;

    if news.is_empty() {
        println!("{}", "  No news found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<12} {}",
        "ID".bright_white().bold(),
        "Date".bright_white().bold(),
        "Title".bright_white().bold()
    );
    println!("  {}", "─".repeat(60).bright_black());

    for item in &news {
        println!(
            "  {:<4} {:<12} {}",
            item.id.to_string().bright_black(),
            item.date.to_string().bright_black(),
            item.title.cyan()
        );
    }

    println!();
    println!("  Total: {}", news.len().to_string().bright_white().bold());
    println!();
    Ok(())
}

/// Deletes a news item after confirmation (default: No).
async fn delete_news(state: &AppState, id: i64) -> Result<()> {
    let confirmed = Confirm::new()
        .with_prompt(format!("Delete news {id} and all its comments?"))
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    state
        .news_service
        .delete_news(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete news: {}", e))?;

    println!("{}", "✅ News deleted".green().bold());
    Ok(())
}

async fn handle_user_action(action: UserAction, state: &AppState) -> Result<()> {
    match action {
        UserAction::Create { username, password } => create_user(state, username, password).await,
        UserAction::List => list_users(state).await,
    }
}

/// Creates an account through the same rules as the signup page.
async fn create_user(state: &AppState, username: String, password: Option<String>) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let (password, generated) = match password {
        Some(p) => (p, false),
        None => (generate_password(), true),
    };

    let user = state
        .auth_service
        .signup(&username, &password, &password)
        .await
        .map_err(|e| match e.as_form_errors() {
            Some(errors) => anyhow::anyhow!("Invalid account: {}", errors.to_json()),
            None => anyhow::anyhow!("Failed to create user: {}", e),
        })?;

    println!("  ID:       {}", user.id.to_string().bright_black());
    println!("  Username: {}", user.username.cyan());
    if generated {
        println!("  Password: {}", password.bright_yellow().bold());
        println!();
        println!(
            "{}",
            "⚠️  IMPORTANT: Save this password now! It is not stored in plain text."
                .red()
                .bold()
        );
    }
    println!();
    println!("{}", "✅ User created successfully!".green().bold());
    Ok(())
}

async fn list_users(state: &AppState) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let users = state
        .auth_service
        .list_users()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<30} {}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Joined".bright_white().bold()
    );
    println!("  {}", "─".repeat(60).bright_black());

    for user in &users {
        println!(
            "  {:<4} {:<30} {}",
            user.id.to_string().bright_black(),
            user.username.cyan(),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();
    Ok(())
}

async fn handle_comment_action(action: CommentAction, state: &AppState) -> Result<()> {
    match action {
        CommentAction::Delete { id, yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete comment {id}?"))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            state
                .news_service
                .delete_comment_as_admin(id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to delete comment: {}", e))?;

            println!("{}", "✅ Comment deleted".green().bold());
        }
    }
    Ok(())
}

/// Displays row counts for every table users see.
async fn handle_stats(state: &AppState) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users = state.auth_service.count_users().await?;
    let news = state.news_service.count_news().await?;
    let comments = state.news_service.count_comments().await?;
    let notes = state.note_service.count().await?;

    println!("  Users:    {}", users.to_string().bright_green().bold());
    println!("  News:     {}", news.to_string().bright_green().bold());
    println!("  Comments: {}", comments.to_string().bright_green().bold());
    println!("  Notes:    {}", notes.to_string().bright_green().bold());
    println!();
    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, state: &AppState) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            if !state.repositories.ping().await {
                anyhow::bail!("Database did not answer");
            }

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let pool = state
                .repositories
                .pool()
                .context("No database pool configured")?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Backend:    {}", state.repositories.backend.bright_white());
            println!();
        }
    }

    Ok(())
}

/// Generates a random 16 character alphanumeric password.
fn generate_password() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const PASSWORD_LEN: usize = 16;

    let mut rng = rand::rng();

    (0..PASSWORD_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
