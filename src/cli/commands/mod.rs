//! Subcommand implementations.

pub mod init;
pub mod seed;
pub mod snapshot;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::adapters::sqlite::{initialize_database, PoolConfig};
use crate::domain::models::Config;

/// Open the configured database, applying pending migrations.
pub(crate) async fn open_database(config: &Config) -> Result<SqlitePool> {
    initialize_database(
        &config.database.url(),
        Some(PoolConfig::from(&config.database)),
    )
    .await
    .with_context(|| format!("Failed to open database at {}", config.database.path))
}
