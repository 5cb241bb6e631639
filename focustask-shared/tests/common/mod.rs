//! Shared helpers for integration tests
//!
//! Each test gets its own SQLite file inside a temporary directory, so tests
//! can run in parallel without sharing state.

#![allow(dead_code)]

use focustask_shared::db::migrations::run_migrations;
use focustask_shared::db::pool::{create_pool, DatabaseConfig};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// A throwaway database; the file is removed when this is dropped
pub struct TestDb {
    pub pool: SqlitePool,
    pub url: String,
    _dir: TempDir,
}

/// Database URL for a not yet created file in a fresh temporary directory
pub fn temp_database_url() -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}", dir.path().join("test.db").display());
    (dir, url)
}

/// Creates an empty database without running migrations
pub async fn empty_db() -> TestDb {
    let (dir, url) = temp_database_url();
    let pool = create_pool(DatabaseConfig {
        url: url.clone(),
        create_if_missing: true,
        ..Default::default()
    })
    .await
    .expect("Failed to create pool");

    TestDb {
        pool,
        url,
        _dir: dir,
    }
}

/// Creates a database with the full schema applied
pub async fn migrated_db() -> TestDb {
    let db = empty_db().await;
    run_migrations(&db.pool).await.expect("Failed to run migrations");
    db
}
