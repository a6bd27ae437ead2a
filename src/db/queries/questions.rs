use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::db::{NewQuestion, Question, QuestionFilter};

const SELECT_QUESTIONS: &str =
    "SELECT id, question, answer, difficulty, category FROM questions WHERE 1 = 1";

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, difficulty, category
FROM questions
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_question_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, difficulty, category
FROM questions
WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Applies the category and exclusion parts of `filter`. The search term is
/// left to the caller: SQLite's `LIKE` only folds ASCII case.
pub async fn filter_questions(
    pool: &SqlitePool,
    filter: &QuestionFilter,
) -> sqlx::Result<Vec<Question>> {
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_QUESTIONS);
    if let Some(category) = filter.category {
        query.push(" AND category = ").push_bind(category);
    }
    if !filter.exclude.is_empty() {
        query.push(" AND id NOT IN (");
        let mut ids = query.separated(", ");
        for id in &filter.exclude {
            ids.push_bind(*id);
        }
        ids.push_unseparated(")");
    }
    query.push(" ORDER BY id");
    query.build_query_as::<Question>().fetch_all(pool).await
}

pub async fn count_questions(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await
}

pub async fn create_question(pool: &SqlitePool, question: &NewQuestion) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, difficulty, category) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.difficulty)
    .bind(question.category)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns `false` when no row had the given id.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let deleted = sqlx::query(
        r#"
DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(deleted > 0)
}

pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, difficulty, category) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (id) DO UPDATE SET
    question = excluded.question,
    answer = excluded.answer,
    difficulty = excluded.difficulty,
    category = excluded.category
            "#,
        )
        .bind(question.id)
        .bind(question.question)
        .bind(question.answer)
        .bind(question.difficulty)
        .bind(question.category)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}
