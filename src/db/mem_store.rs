use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    Category, CategoryRepository, NewQuestion, Question, QuestionFilter, QuestionRepository,
    StoreError, StoreResult,
};

/// In-memory [`TriviaStore`](super::TriviaStore). Tables are keyed by id so
/// iteration follows insertion order, and ids are never reused.
#[derive(Debug, Default)]
pub struct MemStore {
    tables: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<i64, Category>,
    questions: BTreeMap<i64, Question>,
    last_question_id: i64,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store holding exactly the given rows. Question ids are kept;
    /// later inserts continue after the highest one.
    pub fn with_data(categories: Vec<Category>, questions: Vec<Question>) -> Self {
        let last_question_id = questions.iter().map(|q| q.id).max().unwrap_or(0);
        Self {
            tables: RwLock::new(Tables {
                categories: categories.into_iter().map(|c| (c.id, c)).collect(),
                questions: questions.into_iter().map(|q| (q.id, q)).collect(),
                last_question_id,
            }),
        }
    }
}

#[async_trait]
impl CategoryRepository for MemStore {
    async fn all_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn category(&self, id: i64) -> StoreResult<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }
}

#[async_trait]
impl QuestionRepository for MemStore {
    async fn all_questions(&self) -> StoreResult<Vec<Question>> {
        Ok(self.tables.read().await.questions.values().cloned().collect())
    }

    async fn question(&self, id: i64) -> StoreResult<Option<Question>> {
        Ok(self.tables.read().await.questions.get(&id).cloned())
    }

    async fn filter_questions(&self, filter: &QuestionFilter) -> StoreResult<Vec<Question>> {
        Ok(self
            .tables
            .read()
            .await
            .questions
            .values()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect())
    }

    async fn count_questions(&self) -> StoreResult<i64> {
        Ok(self.tables.read().await.questions.len() as i64)
    }

    async fn insert_question(&self, question: NewQuestion) -> StoreResult<Question> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&question.category) {
            return Err(StoreError::Validation(format!(
                "category {} does not exist",
                question.category
            )));
        }
        tables.last_question_id += 1;
        let question = Question {
            id: tables.last_question_id,
            question: question.question,
            answer: question.answer,
            difficulty: question.difficulty,
            category: question.category,
        };
        tables.questions.insert(question.id, question.clone());
        Ok(question)
    }

    async fn delete_question(&self, id: i64) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .questions
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound {
                entity: "question",
                id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemStore {
        MemStore::with_data(
            vec![
                Category {
                    id: 1,
                    kind: "Science".to_string(),
                },
                Category {
                    id: 6,
                    kind: "Sports".to_string(),
                },
            ],
            vec![
                Question {
                    id: 3,
                    question: "Who invented the telephone?".to_string(),
                    answer: "Bell".to_string(),
                    difficulty: 2,
                    category: 1,
                },
                Question {
                    id: 7,
                    question: "Which country won the first World Cup?".to_string(),
                    answer: "Uruguay".to_string(),
                    difficulty: 4,
                    category: 6,
                },
            ],
        )
    }

    fn new_question(category: i64) -> NewQuestion {
        NewQuestion {
            question: "What is H2O?".to_string(),
            answer: "Water".to_string(),
            difficulty: 1,
            category,
        }
    }

    #[tokio::test]
    async fn insert_continues_after_highest_id() {
        let store = store();
        let created = store.insert_question(new_question(1)).await.unwrap();
        assert_eq!(created.id, 8);
        store.delete_question(8).await.unwrap();
        let created = store.insert_question(new_question(1)).await.unwrap();
        assert_eq!(created.id, 9);
        assert_eq!(store.count_questions().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn insert_rejects_unknown_category() {
        let store = store();
        let err = store.insert_question(new_question(42)).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.count_questions().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn delete_missing_question_is_not_found() {
        let err = store().delete_question(100).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                entity: "question",
                id: 100
            }
        ));
    }

    #[tokio::test]
    async fn filter_combines_predicates() {
        let store = store();
        let found = store
            .filter_questions(&QuestionFilter::search("WHO"))
            .await
            .unwrap();
        assert_eq!(found.iter().map(|q| q.id).collect::<Vec<_>>(), vec![3]);

        let found = store
            .filter_questions(&QuestionFilter::default().excluding([3]))
            .await
            .unwrap();
        assert_eq!(found.iter().map(|q| q.id).collect::<Vec<_>>(), vec![7]);

        let found = store
            .filter_questions(&QuestionFilter::in_category(6).excluding([7]))
            .await
            .unwrap();
        assert!(found.is_empty());
    }
}
