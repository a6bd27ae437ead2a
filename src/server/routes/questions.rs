use std::collections::BTreeMap;

use anyhow::anyhow;
use axum::{
    extract::State,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;

use crate::{
    db::{CategoryRepository, NewQuestion, Question, QuestionFilter, QuestionRepository},
    server::{
        app::{AppState, SharedStore},
        pagination::{page_of, PageQuery},
    },
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

use super::{category_labels, ApiError, ApiJson, ApiPath, ApiQuery, ApiResponse};

/// Body of `POST /questions`: a search when `searchTerm` is non-empty,
/// otherwise a new question.
#[derive(Debug, Deserialize)]
struct QuestionsBody {
    #[serde(rename = "searchTerm", default)]
    search_term: Option<String>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
}

impl QuestionsBody {
    fn into_new_question(self) -> anyhow::Result<NewQuestion> {
        Ok(NewQuestion {
            question: self.question.ok_or_else(|| anyhow!("missing field `question`"))?,
            answer: self.answer.ok_or_else(|| anyhow!("missing field `answer`"))?,
            difficulty: self
                .difficulty
                .ok_or_else(|| anyhow!("missing field `difficulty`"))?,
            category: self
                .category
                .ok_or_else(|| anyhow!("missing field `category`"))?,
        })
    }
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    total_questions: usize,
    categories: BTreeMap<i64, String>,
    questions: Vec<Question>,
}

#[derive(Serialize)]
struct DeletedQuestion {
    deleted: i64,
    success: bool,
    total_questions: i64,
}

#[derive(Serialize)]
#[serde(untagged)]
enum QuestionsReply {
    /// `total_questions` is the size of the returned page.
    Search {
        success: bool,
        questions: Vec<Question>,
        total_questions: usize,
    },
    Created {
        success: bool,
        question_created: String,
        created: i64,
        questions: Vec<Question>,
        total_questions: i64,
    },
}

async fn get_questions(
    State(store): State<SharedStore>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let questions = store.all_questions().await?;
    let page = page_of(&questions, query.page);
    if page.is_empty() {
        return Err(ApiError::NotFound);
    }
    let categories = category_labels(store.all_categories().await?);

    Ok(Json(QuestionsPage {
        success: true,
        total_questions: questions.len(),
        categories,
        questions: page.to_vec(),
    }))
}

async fn delete_question(
    State(store): State<SharedStore>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<Json<DeletedQuestion>> {
    store.delete_question(id).await?;
    QUESTIONS_DELETED.inc();
    tracing::info!(id, "Question deleted");

    Ok(Json(DeletedQuestion {
        deleted: id,
        success: true,
        total_questions: store.count_questions().await?,
    }))
}

/// Any failure on either path is reported as unprocessable.
async fn create_or_search_questions(
    State(store): State<SharedStore>,
    ApiQuery(query): ApiQuery<PageQuery>,
    ApiJson(mut body): ApiJson<QuestionsBody>,
) -> ApiResponse<Json<QuestionsReply>> {
    if let Some(term) = body.search_term.take().filter(|t| !t.is_empty()) {
        let found = store
            .filter_questions(&QuestionFilter::search(term.as_str()))
            .await
            .map_err(ApiError::unprocessable)?;
        let questions = page_of(&found, query.page).to_vec();
        tracing::debug!(%term, matched = found.len(), "Searched questions");

        return Ok(Json(QuestionsReply::Search {
            success: true,
            total_questions: questions.len(),
            questions,
        }));
    }

    let new_question = body.into_new_question().map_err(ApiError::Unprocessable)?;
    let created = store
        .insert_question(new_question)
        .await
        .map_err(ApiError::unprocessable)?;
    QUESTIONS_CREATED.inc();
    tracing::info!(id = created.id, category = created.category, "Question created");

    let questions = store.all_questions().await.map_err(ApiError::unprocessable)?;
    let total_questions = store.count_questions().await.map_err(ApiError::unprocessable)?;

    Ok(Json(QuestionsReply::Created {
        success: true,
        question_created: created.question,
        created: created.id,
        questions: page_of(&questions, query.page).to_vec(),
        total_questions,
    }))
}

pub fn questions_router() -> Router<AppState> {
    Router::new()
        .route(
            "/questions",
            get(get_questions).post(create_or_search_questions),
        )
        .route("/questions/{id}", delete(delete_question))
}
