//! Legacy User Importer
//!
//! One-shot CLI that reads the legacy application's SQLite database
//! and upserts its accounts into the user directory. Imported accounts
//! keep their bcrypt digest and authenticate through the legacy
//! fallback until their first successful login migrates them.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use auth::PgAuthRepository;
use auth::application::ImportUsersUseCase;
use auth::infra::read_legacy_users;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "importer", about = "Import users from the legacy SQLite database")]
struct Args {
    /// Path to the legacy SQLite database file
    #[arg(long, default_value = "users.db")]
    source: PathBuf,

    /// Accepted for compatibility with the legacy tooling; imports
    /// always reset the current-scheme credential regardless
    #[arg(long)]
    force_reset: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "importer=info,auth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    let rows = read_legacy_users(&args.source).await?;

    let repo = Arc::new(PgAuthRepository::new(pool));
    let summary = ImportUsersUseCase::new(repo)
        .execute(rows, args.force_reset)
        .await?;

    tracing::info!(
        created = summary.created,
        updated = summary.updated,
        skipped = summary.skipped,
        "Importer finished"
    );

    Ok(())
}
