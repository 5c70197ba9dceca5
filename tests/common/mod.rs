//! Common test utilities for integration tests
//!
//! Provides a migrated in-memory database, optionally seeded with the sample
//! data set, and engine construction helpers.

#![allow(dead_code)]

use std::sync::Arc;

use kpi_engine::adapters::sqlite::{
    create_migrated_test_pool, seed_sample_data, SeedOutcome, SqliteAcademicDataSource,
    SqliteSnapshotRepository,
};
use kpi_engine::domain::models::Config;
use kpi_engine::KpiEngine;
use sqlx::SqlitePool;

/// Seeded ids. The seed inserts into an empty database, so autoincrement
/// starts at 1.
pub const COMPUTER_SCIENCE: i64 = 1;
pub const SOFTWARE_ENGINEERING: i64 = 2;
pub const FIRST_SEMESTER: i64 = 1;
pub const SECOND_SEMESTER: i64 = 2;

/// Migrated in-memory database.
pub async fn empty_pool() -> SqlitePool {
    create_migrated_test_pool()
        .await
        .expect("Failed to create migrated test pool")
}

/// Migrated in-memory database holding the sample data set.
pub async fn seeded_pool() -> SqlitePool {
    let pool = empty_pool().await;
    let outcome = seed_sample_data(&pool).await.expect("Failed to seed");
    assert!(matches!(outcome, SeedOutcome::Seeded(_)));
    pool
}

/// Engine over `pool` with the standard pillars for `config`.
pub fn engine(pool: &SqlitePool, config: &Config) -> KpiEngine {
    KpiEngine::new(
        config,
        Arc::new(SqliteAcademicDataSource::new(pool.clone())),
        Arc::new(SqliteSnapshotRepository::new(pool.clone())),
    )
    .expect("Failed to build engine")
}

/// Initialize tracing output for a test run.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}
