//! Authx Store CLI
//!
//! Operate the users store from the command line: ensure indexes, create a
//! user, fetch a user.

use std::time::Duration;

use anyhow::Context as _;
use authx_store::{
    Config, Context, DocumentDatabase, DocumentEntityStore, EntityStore, MemoryDatabase, User,
};
use clap::{Parser, Subcommand};

// =============================================================================
// TigerStyle Constants
// =============================================================================

/// Application name
pub const APP_NAME: &str = "authx-store";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default per-command deadline in milliseconds
pub const COMMAND_TIMEOUT_MS_DEFAULT: u64 = 10_000;

// =============================================================================
// CLI
// =============================================================================

/// Authx users store
#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(about = "Create and look up users in the authx document store")]
#[command(version)]
struct Cli {
    /// Postgres URL (overrides AUTHX_DATABASE_URL); in-memory when unset
    #[arg(long)]
    database_url: Option<String>,

    /// Per-command deadline in milliseconds
    #[arg(long, default_value_t = COMMAND_TIMEOUT_MS_DEFAULT)]
    timeout_ms: u64,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ensure the users collection and its unique index exist
    Init,
    /// Create a user
    CreateUser {
        /// User ID; a random UUID when omitted
        id: Option<String>,
        /// Display name
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Print a user as JSON
    GetUser {
        /// User ID
        id: String,
    },
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("{} v{}", APP_NAME, APP_VERSION);

    let config = Config::from_env()
        .context("failed to load configuration")?
        .override_database_url(cli.database_url.clone());

    match config.database_url.clone() {
        #[cfg(feature = "postgres")]
        Some(url) => {
            let db = authx_store::PostgresDatabase::connect(&url, config.max_connections)
                .await
                .context("failed to connect to database")?;
            let result = run(&cli, &config, &db).await;
            db.close().await;
            result
        }
        #[cfg(not(feature = "postgres"))]
        Some(_) => anyhow::bail!("database URL given but built without the `postgres` feature"),
        None => {
            tracing::warn!("No database URL configured; using an in-memory store");
            run(&cli, &config, &MemoryDatabase::new()).await
        }
    }
}

async fn run<D: DocumentDatabase>(cli: &Cli, config: &Config, db: &D) -> anyhow::Result<()> {
    let store: DocumentEntityStore<User, D::Collection> =
        DocumentEntityStore::with_index_timeout(db, config.create_index_timeout)
            .await
            .context("failed to initialize users store")?;

    let ctx = Context::background().with_timeout(Duration::from_millis(cli.timeout_ms));

    match &cli.command {
        Command::Init => {
            tracing::info!("Users store ready");
        }
        Command::CreateUser { id, name } => {
            let id = id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            anyhow::ensure!(!id.is_empty(), "user id cannot be empty");
            let user = User::new(id, name.clone());
            store.create(&ctx, &user).await?;
            println!("{}", user.id);
        }
        Command::GetUser { id } => {
            anyhow::ensure!(!id.is_empty(), "user id cannot be empty");
            let user = store.get(&ctx, id).await?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
    }

    Ok(())
}
