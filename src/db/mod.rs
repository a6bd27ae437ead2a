pub mod mem_store;
pub mod queries;
pub mod sqlite_store;
pub mod store;
pub mod transfer;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub use mem_store::MemStore;
pub use sqlite_store::SqliteStore;
pub use store::{CategoryRepository, NewQuestion, QuestionFilter, QuestionRepository, TriviaStore};

use crate::configuration::DatabaseSettings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub difficulty: i64,
    pub category: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("invalid {0}")]
    Validation(String),
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub async fn establish_connection(settings: &DatabaseSettings) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", settings.path))?
        .create_if_missing(settings.create_if_missing)
        .foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
