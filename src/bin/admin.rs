//! CLI administration tool for linkshort.
//!
//! Provides commands for managing accounts, viewing statistics,
//! and performing database operations without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (prompts for missing values)
//! cargo run --bin admin -- user create --email alice@example.com
//!
//! # Mint a session token for an existing account
//! cargo run --bin admin -- user token alice@example.com
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
//! - `DATABASE_URL` or `DB_*` components (required)
//! - `JWT_SECRET` (required for `user token`)

use linkshort::application::services::{AuthService, TokenService};
use linkshort::config::{Config, MIN_JWT_SECRET_LEN, mask_connection_string};
use linkshort::domain::repositories::{ClickRepository, UserRepository};
use linkshort::infrastructure::persistence::{PgClickRepository, PgUserRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkshort.
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
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Account subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        #[arg(short, long)]
        email: Option<String>,

        #[arg(short, long)]
        username: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Issue a session token for an existing account
    Token {
        /// Account email
        email: String,
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

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url).await.with_context(|| {
        format!(
            "Failed to connect to database at {}",
            mask_connection_string(&database_url)
        )
    })?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn token_service_from_env() -> Result<Arc<TokenService>> {
    let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

    if secret.len() < MIN_JWT_SECRET_LEN {
        anyhow::bail!("JWT_SECRET must be at least {} bytes", MIN_JWT_SECRET_LEN);
    }

    Ok(Arc::new(TokenService::new(&secret)))
}

/// Dispatches account commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let users = Arc::new(PgUserRepository::new(Arc::new(pool.clone())));

    match action {
        UserAction::Create {
            email,
            username,
            yes,
        } => create_user(users, email, username, yes).await?,
        UserAction::Token { email } => issue_token(users, &email).await?,
    }

    Ok(())
}

/// Creates an account with interactive prompts.
///
/// The password is always read from the terminal without echo, never from
/// arguments, so it does not end up in shell history.
async fn create_user(
    users: Arc<PgUserRepository>,
    email: Option<String>,
    username: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create Account".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .validate_with(|p: &String| {
            if p.chars().count() >= 8 {
                Ok(())
            } else {
                Err("Password must be at least 8 characters")
            }
        })
        .interact()?;

    println!();
    println!("{}", "Account details:".bright_white().bold());
    println!("  Email:    {}", email.cyan());
    println!(
        "  Username: {}",
        username.as_deref().unwrap_or("-").cyan()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this account?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    // Token signing is not used for registration; any valid key will do.
    let service = AuthService::new(users, Arc::new(TokenService::new(&"x".repeat(32))));

    let user = service
        .register(&email, &password, username.as_deref())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create account: {}", e))?;

    println!();
    println!("{}", "✅ Account created successfully!".green().bold());
    println!("  ID: {}", user.id.to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Prints a fresh session token for an account.
async fn issue_token(users: Arc<PgUserRepository>, email: &str) -> Result<()> {
    let tokens = token_service_from_env()?;

    let user = users
        .find_by_email(&email.trim().to_lowercase())
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Account not found")?;

    let issued = tokens
        .issue(user.id)
        .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))?;

    println!("{}", "🔑 Session Token".bright_blue().bold());
    println!();
    println!("  User:    {} (id {})", user.email.cyan(), user.id);
    println!(
        "  Expires: {}",
        issued.expires_at.format("%Y-%m-%d %H:%M UTC").to_string().bright_black()
    );
    println!("  Token:   {}", issued.token.bright_yellow());
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/links",
        issued.token
    );
    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of accounts
/// - Total number of links
/// - Total number of recorded clicks
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let clicks = PgClickRepository::new(Arc::new(pool.clone()));
    let clicks_count = clicks
        .count_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count clicks: {}", e))?;

    println!(
        "  Users:  {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Links:  {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks: {}",
        clicks_count.to_string().bright_green().bold()
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

            let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations applied: {}", applied.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
