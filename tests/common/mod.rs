use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use trivia_api::db::{
    Category, CategoryRepository, MemStore, NewQuestion, Question, QuestionFilter,
    QuestionRepository, StoreError, TriviaStore,
};
use trivia_api::server::app::{build_router, AppState};

pub fn seeds_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seeds")
}

fn read_seed<T: serde::de::DeserializeOwned>(file: &str) -> Vec<T> {
    csv::Reader::from_path(seeds_dir().join(file))
        .expect("seed file should exist")
        .deserialize()
        .collect::<Result<_, _>>()
        .expect("seed file should parse")
}

pub fn seed_categories() -> Vec<Category> {
    read_seed("categories.csv")
}

pub fn seed_questions() -> Vec<Question> {
    read_seed("questions.csv")
}

pub fn seeded_store() -> Arc<MemStore> {
    Arc::new(MemStore::with_data(seed_categories(), seed_questions()))
}

pub fn app_with<S: TriviaStore + 'static>(store: Arc<S>) -> Router {
    build_router(AppState::new(store))
}

/// Serves the seed categories but fails every question read and write, as
/// a store whose pool has gone away would.
pub struct BrokenStore {
    categories: Vec<Category>,
}

impl BrokenStore {
    pub fn new() -> Self {
        Self {
            categories: seed_categories(),
        }
    }
}

fn pool_closed<T>() -> Result<T, StoreError> {
    Err(StoreError::Storage(sqlx::Error::PoolClosed))
}

#[async_trait]
impl CategoryRepository for BrokenStore {
    async fn all_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.categories.clone())
    }

    async fn category(&self, id: i64) -> Result<Option<Category>, StoreError> {
        Ok(self.categories.iter().find(|c| c.id == id).cloned())
    }
}

#[async_trait]
impl QuestionRepository for BrokenStore {
    async fn all_questions(&self) -> Result<Vec<Question>, StoreError> {
        pool_closed()
    }

    async fn question(&self, _id: i64) -> Result<Option<Question>, StoreError> {
        pool_closed()
    }

    async fn filter_questions(&self, _filter: &QuestionFilter) -> Result<Vec<Question>, StoreError> {
        pool_closed()
    }

    async fn count_questions(&self) -> Result<i64, StoreError> {
        pool_closed()
    }

    async fn insert_question(&self, _question: NewQuestion) -> Result<Question, StoreError> {
        pool_closed()
    }

    async fn delete_question(&self, _id: i64) -> Result<(), StoreError> {
        pool_closed()
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub text: String,
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap_or_else(|err| panic!("failed to build request: {err}"));

    let response = app
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|err| panic!("request failed: {err}"));
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    TestResponse {
        status,
        headers,
        body,
        text: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

pub fn ids(questions: &Value) -> Vec<i64> {
    questions
        .as_array()
        .expect("questions should be an array")
        .iter()
        .map(|q| q["id"].as_i64().expect("question id"))
        .collect()
}
