use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use trivia_api::configuration::DatabaseSettings;
use trivia_api::db::transfer::{export_data, import_data};
use trivia_api::db::{establish_connection, run_migrations};
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database path
    db_path: PathBuf,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the schema
    Migrate,
    /// Upsert categories.csv and questions.csv from a directory
    Import { path: PathBuf },
    /// Write categories.csv and questions.csv into a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = DatabaseSettings {
        path: cli.db_path.display().to_string(),
        create_if_missing: true,
        max_connections: 1,
    };
    let pool = establish_connection(&settings)
        .await
        .context("Cannot connect to DB")?;
    run_migrations(&pool).await.context("Migrations failed")?;

    match cli.command {
        Commands::Migrate => {}
        Commands::Export { path } => export_data(&pool, &path).await.context("Cannot export")?,
        Commands::Import { path } => import_data(&pool, &path).await.context("Cannot import")?,
    }
    Ok(())
}
