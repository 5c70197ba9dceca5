//! SQLite adapters for the KPI engine.

pub mod academic_data_source;
pub mod connection;
pub mod migrations;
pub mod seed;
pub mod snapshot_repository;

pub use academic_data_source::SqliteAcademicDataSource;
pub use connection::{create_pool, create_test_pool, verify_connection, ConnectionError, PoolConfig};
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use seed::{seed_sample_data, SeedOutcome, SeedSummary};
pub use snapshot_repository::SqliteSnapshotRepository;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{KpiError, KpiResult};

/// Parse a UUID string from a SQLite row field.
pub fn parse_uuid(s: &str) -> KpiResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| KpiError::Serialization(e.to_string()))
}

/// Parse an RFC3339 datetime string from a SQLite row field.
pub fn parse_datetime(s: &str) -> KpiResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map_err(|e| KpiError::Serialization(e.to_string()))
        .map(|dt| dt.with_timezone(&Utc))
}

/// Errors from [`initialize_database`].
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Opening the pool failed.
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    /// Migrating the schema failed.
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
    /// Any other query failure.
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),
}

/// Open the database at `database_url` and bring its schema up to date.
pub async fn initialize_database(
    database_url: &str,
    config: Option<PoolConfig>,
) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(database_url, config).await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}
