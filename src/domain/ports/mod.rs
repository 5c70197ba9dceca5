//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces at the engine's seams:
//! - Collector: gathers and validates raw records from one data source
//! - Calculator: derives a family of metrics for a department and session
//! - AcademicDataSource: read-only access to stored academic entities
//! - SnapshotRepository: append-only snapshot persistence
//!
//! These traits keep the scoring pipeline independent of SQLite, HTTP and
//! any particular data origin.

pub mod academic_data_source;
pub mod calculator;
pub mod collector;
pub mod snapshot_repository;

pub use academic_data_source::AcademicDataSource;
pub use calculator::Calculator;
pub use collector::Collector;
pub use snapshot_repository::{SnapshotRepository, StoredSnapshot};
