use axum::{extract::State, routing::post, Json, Router};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::{
    db::{Question, QuestionFilter, QuestionRepository},
    server::app::{AppState, SharedStore},
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::{ApiError, ApiJson, ApiResponse};

/// Category id meaning "no category filter".
pub const ALL_CATEGORIES: i64 = 0;

#[derive(Debug, Deserialize)]
struct QuizRound {
    previous_questions: Vec<i64>,
    quiz_category: QuizCategory,
}

#[derive(Debug, Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Serialize)]
struct NextQuestion {
    question: Option<Question>,
    success: bool,
}

impl QuizRound {
    fn filter(&self) -> QuestionFilter {
        let filter = match self.quiz_category.id {
            ALL_CATEGORIES => QuestionFilter::default(),
            id => QuestionFilter::in_category(id),
        };
        filter.excluding(self.previous_questions.iter().copied())
    }
}

async fn play(
    State(store): State<SharedStore>,
    ApiJson(round): ApiJson<QuizRound>,
) -> ApiResponse<Json<NextQuestion>> {
    let remaining = store
        .filter_questions(&round.filter())
        .await
        .map_err(ApiError::unprocessable)?;
    let question = remaining.choose(&mut rand::thread_rng()).cloned();

    match &question {
        Some(q) => {
            let category = q.category.to_string();
            QUIZ_QUESTIONS_SERVED
                .with_label_values(&[category.as_str()])
                .inc();
            tracing::debug!(
                id = q.id,
                remaining = remaining.len(),
                asked = round.previous_questions.len(),
                "Quiz question served"
            );
        }
        None => tracing::debug!(
            category = round.quiz_category.id,
            asked = round.previous_questions.len(),
            "Quiz exhausted"
        ),
    }

    Ok(Json(NextQuestion {
        question,
        success: true,
    }))
}

pub fn quiz_router() -> Router<AppState> {
    Router::new().route("/play", post(play))
}
