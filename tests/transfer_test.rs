mod common;

use common::{seed_categories, seed_questions, seeds_dir};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use trivia_api::db::queries::{categories, questions};
use trivia_api::db::run_migrations;
use trivia_api::db::transfer::{export_data, import_data, CATEGORIES_FILE, QUESTIONS_FILE};

async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    run_migrations(&pool).await.expect("migrations failed");
    pool
}

#[tokio::test]
async fn import_then_export_matches_seeds() {
    let pool = create_test_pool().await;
    import_data(&pool, &seeds_dir()).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("export");
    export_data(&pool, &out).await.unwrap();

    assert!(out.join(CATEGORIES_FILE).exists());
    assert!(out.join(QUESTIONS_FILE).exists());

    let other = create_test_pool().await;
    import_data(&other, &out).await.unwrap();
    assert_eq!(
        categories::get_all_categories(&other).await.unwrap(),
        seed_categories()
    );
    assert_eq!(
        questions::get_all_questions(&other).await.unwrap(),
        seed_questions()
    );
}

#[tokio::test]
async fn import_is_an_upsert() {
    let pool = create_test_pool().await;
    import_data(&pool, &seeds_dir()).await.unwrap();
    import_data(&pool, &seeds_dir()).await.unwrap();

    assert_eq!(questions::count_questions(&pool).await.unwrap(), 19);
    assert_eq!(categories::get_all_categories(&pool).await.unwrap().len(), 6);
}

#[tokio::test]
async fn import_from_missing_directory_fails() {
    let pool = create_test_pool().await;
    let dir = tempfile::tempdir().unwrap();

    let err = import_data(&pool, &dir.path().join("missing")).await.unwrap_err();
    assert!(err.to_string().contains(CATEGORIES_FILE));
}
