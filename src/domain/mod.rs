//! Domain layer for the KPI engine
//!
//! This module contains the scoring model, the error taxonomy and the ports
//! the engine depends on.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{KpiError, KpiResult, SnapshotBuildError};
