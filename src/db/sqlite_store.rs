use async_trait::async_trait;
use sqlx::SqlitePool;

use super::queries::{categories, questions};
use super::{
    Category, CategoryRepository, NewQuestion, Question, QuestionFilter, QuestionRepository,
    StoreError, StoreResult,
};

/// [`TriviaStore`](super::TriviaStore) backed by the SQLite pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CategoryRepository for SqliteStore {
    async fn all_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(categories::get_all_categories(&self.pool).await?)
    }

    async fn category(&self, id: i64) -> StoreResult<Option<Category>> {
        Ok(categories::get_category(&self.pool, id).await?)
    }
}

#[async_trait]
impl QuestionRepository for SqliteStore {
    async fn all_questions(&self) -> StoreResult<Vec<Question>> {
        Ok(questions::get_all_questions(&self.pool).await?)
    }

    async fn question(&self, id: i64) -> StoreResult<Option<Question>> {
        Ok(questions::get_question_by_id(&self.pool, id).await?)
    }

    async fn filter_questions(&self, filter: &QuestionFilter) -> StoreResult<Vec<Question>> {
        let rows = questions::filter_questions(&self.pool, filter).await?;
        Ok(rows.into_iter().filter(|q| filter.matches(q)).collect())
    }

    async fn count_questions(&self) -> StoreResult<i64> {
        Ok(questions::count_questions(&self.pool).await?)
    }

    async fn insert_question(&self, question: NewQuestion) -> StoreResult<Question> {
        let id = questions::create_question(&self.pool, &question).await?;
        questions::get_question_by_id(&self.pool, id)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "question",
                id,
            })
    }

    async fn delete_question(&self, id: i64) -> StoreResult<()> {
        if questions::delete_question(&self.pool, id).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                entity: "question",
                id,
            })
        }
    }
}
