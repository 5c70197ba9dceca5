//! Calculator port.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::errors::KpiResult;
use crate::domain::models::{DepartmentId, Metric, SessionId};

/// Capability that derives one family of metrics for a department and
/// academic session.
///
/// Implementations must be deterministic: two calls against unchanged stored
/// data return identical metrics. A metric whose population is empty is
/// reported as `InsufficientData`, never as a zero value.
#[async_trait]
pub trait Calculator: Send + Sync {
    /// Name of the calculator, used when its metrics are omitted.
    fn name(&self) -> &str;

    /// Calculate every metric this calculator owns, keyed by metric name.
    async fn calculate(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<BTreeMap<String, Metric>>;
}
