//! Embedded schema migrations.

use sqlx::{Executor, SqlitePool};
use thiserror::Error;

/// Errors applying embedded migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A migration's SQL or bookkeeping failed; its transaction rolled back.
    #[error("Failed to execute migration {version}: {source}")]
    ExecutionError {
        /// Failing migration.
        version: i64,
        /// Underlying error.
        #[source]
        source: sqlx::Error,
    },
    /// The applied version could not be read.
    #[error("Failed to get schema version: {0}")]
    VersionCheckError(#[source] sqlx::Error),
}

/// One versioned schema change.
#[derive(Debug, Clone)]
pub struct Migration {
    /// Applied in ascending order.
    pub version: i64,
    /// Recorded in `schema_migrations`.
    pub description: String,
    /// Statements run in one transaction.
    pub sql: String,
}

/// Applies [`Migration`]s to a pool and records them.
pub struct Migrator {
    pool: SqlitePool,
}

impl Migrator {
    /// Migrator over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply every migration newer than the recorded schema version and
    /// return how many ran.
    pub async fn run_embedded_migrations(
        &self,
        migrations: Vec<Migration>,
    ) -> Result<usize, MigrationError> {
        self.ensure_migrations_table().await?;
        let current_version = self.get_current_version().await?;
        let pending: Vec<_> = migrations
            .into_iter()
            .filter(|m| m.version > current_version)
            .collect();

        for migration in &pending {
            self.apply_migration(migration).await?;
            tracing::info!(
                version = migration.version,
                description = %migration.description,
                "Applied migration"
            );
        }

        Ok(pending.len())
    }

    async fn ensure_migrations_table(&self) -> Result<(), MigrationError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now')),
                description TEXT
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| MigrationError::ExecutionError {
            version: 0,
            source: e,
        })?;
        Ok(())
    }

    /// Highest applied version, `0` on a fresh database.
    pub async fn get_current_version(&self) -> Result<i64, MigrationError> {
        let (version,): (i64,) =
            sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
                .fetch_one(&self.pool)
                .await
                .map_err(MigrationError::VersionCheckError)?;
        Ok(version)
    }

    async fn apply_migration(&self, migration: &Migration) -> Result<(), MigrationError> {
        let failed = |source| MigrationError::ExecutionError {
            version: migration.version,
            source,
        };

        let mut tx = self.pool.begin().await.map_err(failed)?;
        (&mut *tx)
            .execute(migration.sql.as_str())
            .await
            .map_err(failed)?;
        sqlx::query("INSERT INTO schema_migrations (version, description) VALUES (?, ?)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;
        tx.commit().await.map_err(failed)?;
        Ok(())
    }
}

/// Departments, sessions, staff, students and their activity records.
pub fn academic_schema_migration() -> Migration {
    Migration {
        version: 1,
        description: "Academic entities".to_string(),
        sql: include_str!("../../../migrations/001_academic_schema.sql").to_string(),
    }
}

/// Snapshot header, pillar and metric tables.
pub fn kpi_snapshots_migration() -> Migration {
    Migration {
        version: 2,
        description: "KPI snapshot storage".to_string(),
        sql: include_str!("../../../migrations/002_kpi_snapshots.sql").to_string(),
    }
}

/// Every migration shipped with the crate, in order.
pub fn all_embedded_migrations() -> Vec<Migration> {
    vec![academic_schema_migration(), kpi_snapshots_migration()]
}
