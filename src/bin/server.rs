use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use trivia_api::configuration::get_configuration;
use trivia_api::db::{establish_connection, run_migrations, SqliteStore};
use trivia_api::server::app::{run_server, AppState};
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Settings file, overriding ./configuration.*
    #[clap(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings =
        get_configuration(cli.config.as_deref()).context("Failed to read configuration")?;

    let pool = establish_connection(&settings.database)
        .await
        .with_context(|| format!("Cannot open database {}", settings.database.path))?;

    tracing::info!("Running db migrations...");
    run_migrations(&pool).await?;

    let state = AppState::new(Arc::new(SqliteStore::new(pool)));
    run_server(state, &settings.application).await
}
