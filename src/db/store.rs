use async_trait::async_trait;

use super::{Category, Question, StoreResult};

/// Predicate over the questions table. Every set field narrows the result;
/// an empty filter matches every question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    pub category: Option<i64>,
    /// Case-insensitive substring of the question text, taken literally.
    pub search: Option<String>,
    pub exclude: Vec<i64>,
}

impl QuestionFilter {
    pub fn in_category(category: i64) -> Self {
        Self {
            category: Some(category),
            ..Default::default()
        }
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Default::default()
        }
    }

    pub fn excluding(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.exclude.extend(ids);
        self
    }

    pub fn matches(&self, question: &Question) -> bool {
        if self.category.is_some_and(|c| c != question.category) {
            return false;
        }
        if let Some(term) = &self.search {
            if !question
                .question
                .to_lowercase()
                .contains(&term.to_lowercase())
            {
                return false;
            }
        }
        !self.exclude.contains(&question.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub difficulty: i64,
    pub category: i64,
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by id.
    async fn all_categories(&self) -> StoreResult<Vec<Category>>;

    async fn category(&self, id: i64) -> StoreResult<Option<Category>>;
}

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// All questions in insertion order.
    async fn all_questions(&self) -> StoreResult<Vec<Question>>;

    async fn question(&self, id: i64) -> StoreResult<Option<Question>>;

    /// Questions matching `filter`, in insertion order.
    async fn filter_questions(&self, filter: &QuestionFilter) -> StoreResult<Vec<Question>>;

    async fn count_questions(&self) -> StoreResult<i64>;

    /// Persists a question and returns it with its generated id. A category
    /// that does not exist is rejected by the store.
    async fn insert_question(&self, question: NewQuestion) -> StoreResult<Question>;

    /// Fails with [`StoreError::NotFound`](super::StoreError::NotFound) when
    /// no such question exists.
    async fn delete_question(&self, id: i64) -> StoreResult<()>;
}

pub trait TriviaStore: CategoryRepository + QuestionRepository {}

impl<T> TriviaStore for T where T: CategoryRepository + QuestionRepository {}
