//! Scoring pipeline services.
//!
//! Collectors feed calculators, calculators feed pillar aggregators, and the
//! snapshot builder turns pillars into a persisted [`KpiSnapshot`]. The
//! [`KpiEngine`] ties the pipeline to the configured pillar set.
//!
//! [`KpiSnapshot`]: crate::domain::models::KpiSnapshot

pub mod calculators;
pub mod catalog;
pub mod collectors;
pub mod engine;
pub mod pillar_aggregator;
pub mod snapshot_builder;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::standard_pillars;
pub use engine::KpiEngine;
pub use pillar_aggregator::PillarAggregator;
pub use snapshot_builder::SnapshotBuilder;
