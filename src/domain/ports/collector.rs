//! Collector port.

use async_trait::async_trait;

use crate::domain::errors::KpiResult;
use crate::domain::models::{CollectedRecord, CollectionScope, RecordCheck};

/// Capability that gathers raw facts from one data source.
///
/// `collect` returns the raw, unvalidated records. Callers normally go
/// through [`gather`](crate::services::collectors::gather), which applies the
/// scope timeout and filters the output through [`validate`](Self::validate).
///
/// # Examples
///
/// ```no_run
/// use kpi_engine::domain::models::CollectionScope;
/// use kpi_engine::domain::ports::Collector;
/// use kpi_engine::services::collectors::gather;
///
/// async fn example(collector: &dyn Collector, scope: CollectionScope) -> anyhow::Result<()> {
///     let collection = gather(collector, &scope).await?;
///     println!("{} kept, {} skipped", collection.len(), collection.skipped_count());
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait Collector: Send + Sync {
    /// Human-readable name used in logs and errors.
    fn name(&self) -> &str;

    /// Pull raw records scoped by department and session.
    ///
    /// An unreachable origin is an error (`DataSourceUnavailable`), never an
    /// empty vector: an empty vector means the origin answered with nothing.
    async fn collect(&self, scope: &CollectionScope) -> KpiResult<Vec<CollectedRecord>>;

    /// Pure predicate deciding whether a record may reach a calculator.
    fn validate(&self, record: &CollectedRecord) -> RecordCheck;
}
