use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{
    db::{CategoryRepository, Question, QuestionFilter, QuestionRepository},
    server::{
        app::{AppState, SharedStore},
        pagination::{page_of, PageQuery},
    },
};

use super::{ApiError, ApiPath, ApiQuery, ApiResponse};

#[derive(Serialize)]
struct CategoriesListing {
    success: bool,
    categories: BTreeMap<i64, i64>,
}

#[derive(Serialize)]
struct CategoryQuestions {
    success: bool,
    total_questions: i64,
    current_category: String,
    questions: Vec<Question>,
}

// Values are category ids, not labels; existing clients read this shape.
async fn get_categories(State(store): State<SharedStore>) -> ApiResponse<Json<CategoriesListing>> {
    let categories: BTreeMap<i64, i64> = store
        .all_categories()
        .await?
        .into_iter()
        .map(|c| (c.id, c.id))
        .collect();
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesListing {
        success: true,
        categories,
    }))
}

/// `total_questions` counts every question in the store, not only this
/// category.
async fn get_questions_by_category(
    State(store): State<SharedStore>,
    ApiPath(category_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResponse<Json<CategoryQuestions>> {
    let category = store.category(category_id).await?.ok_or(ApiError::NotFound)?;

    let questions = store
        .filter_questions(&QuestionFilter::in_category(category.id))
        .await
        .map_err(ApiError::bad_request)?;
    let total_questions = store.count_questions().await.map_err(ApiError::bad_request)?;

    tracing::debug!(
        category = %category.kind,
        matched = questions.len(),
        page = query.page,
        "Listing questions by category"
    );
    Ok(Json(CategoryQuestions {
        success: true,
        total_questions,
        current_category: category.kind,
        questions: page_of(&questions, query.page).to_vec(),
    }))
}

pub fn category_router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(get_categories))
        .route(
            "/categories/{category_id}/questions",
            get(get_questions_by_category),
        )
}
