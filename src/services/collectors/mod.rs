//! Collector implementations and the validated collection runner.
//!
//! [`gather`] is the one place where collector output is bounded by the
//! scope timeout and filtered through the collector's `validate`. Calculators
//! never see a record that failed validation; skipped records are counted in
//! the returned [`Collection`] and logged.

pub mod database;
pub mod github;
pub mod validation;

use std::time::Instant;

use crate::domain::errors::{KpiError, KpiResult};
use crate::domain::models::{Collection, CollectionScope, RecordCheck, SkippedRecord};
use crate::domain::ports::Collector;

pub use database::{Dataset, DatabaseCollector};
pub use github::GitHubActivityCollector;

/// Run `collector` for `scope` and split its output into kept and skipped
/// records.
///
/// A collector that does not answer within `scope.timeout` fails with
/// `DataSourceUnavailable`.
pub async fn gather(collector: &dyn Collector, scope: &CollectionScope) -> KpiResult<Collection> {
    let start = Instant::now();

    let raw = match tokio::time::timeout(scope.timeout, collector.collect(scope)).await {
        Ok(result) => result.inspect_err(|err| {
            tracing::error!(
                collector = collector.name(),
                department_id = scope.department_id,
                session_id = scope.session_id,
                error = %err,
                "Collection failed"
            );
        })?,
        Err(_) => {
            let timeout_ms = scope.timeout.as_millis() as u64;
            tracing::error!(
                collector = collector.name(),
                department_id = scope.department_id,
                session_id = scope.session_id,
                timeout_ms,
                "Collection timed out"
            );
            return Err(KpiError::unavailable(
                collector.name(),
                format!("collection timed out after {timeout_ms} ms"),
            ));
        }
    };

    let mut collection = Collection::default();
    for (index, record) in raw.into_iter().enumerate() {
        match collector.validate(&record) {
            RecordCheck::Valid => collection.records.push(record),
            RecordCheck::Invalid(reason) => {
                tracing::debug!(
                    collector = collector.name(),
                    index,
                    reason = %reason,
                    "Record failed validation; skipping"
                );
                collection.skipped.push(SkippedRecord { index, reason });
            }
        }
    }

    if collection.skipped_count() > 0 {
        tracing::warn!(
            collector = collector.name(),
            department_id = scope.department_id,
            session_id = scope.session_id,
            skipped = collection.skipped_count(),
            kept = collection.len(),
            "Collector skipped invalid records"
        );
    }

    tracing::debug!(
        collector = collector.name(),
        kept = collection.len(),
        skipped = collection.skipped_count(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Collection complete"
    );

    Ok(collection)
}
