//! KPI Engine - departmental key performance indicators
//!
//! Computes, scores and stores KPI snapshots for an academic department in
//! one session. Data collectors gather and validate raw records, calculators
//! turn them into metrics scored against targets, pillar aggregators group
//! calculators into themes, and the snapshot builder runs every pillar
//! concurrently and persists the result.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Scoring model, errors and port traits
//! - **Service Layer** (`services`): Collectors, calculators, pillars, engine
//! - **Adapters** (`adapters`): SQLite storage and the GitHub REST client
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use kpi_engine::adapters::sqlite::{initialize_database, SqliteAcademicDataSource, SqliteSnapshotRepository};
//! use kpi_engine::{Config, KpiEngine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let pool = initialize_database(&config.database.url(), None).await?;
//!     let engine = KpiEngine::new(
//!         &config,
//!         Arc::new(SqliteAcademicDataSource::new(pool.clone())),
//!         Arc::new(SqliteSnapshotRepository::new(pool)),
//!     )?;
//!     let snapshot = engine.produce_snapshot(1, 1).await?;
//!     println!("{}", snapshot.overall_score());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{KpiError, KpiResult, SnapshotBuildError};
pub use domain::models::{Config, KpiSnapshot, Metric, MetricStatus, Pillar};
pub use domain::ports::{AcademicDataSource, Calculator, Collector, SnapshotRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{KpiEngine, PillarAggregator, SnapshotBuilder};
