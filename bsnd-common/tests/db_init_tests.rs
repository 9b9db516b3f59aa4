//! Tests for on-disk database initialization

use bsnd_common::db::init::{get_setting, init_database, DEFAULT_MIDTRO_POLICY};

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("root").join("bsnd.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("bsnd.db");

    let pool1 = init_database(&db_path).await.unwrap();
    pool1.close().await;

    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_default_settings_initialized() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("bsnd.db")).await.unwrap();

    let policy = get_setting(&pool, "midtro_policy").await.unwrap();
    assert_eq!(policy.as_deref(), Some(DEFAULT_MIDTRO_POLICY));
}
