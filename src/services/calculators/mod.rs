//! Standard calculators.
//!
//! Each calculator reads validated records through one or more
//! [`RecordSource`]s and scores what it derives with a [`Scoring`] built from
//! the engine configuration for the calculator's pillar.

pub mod course_delivery;
pub mod event_participation;
pub mod feedback;
pub mod github_activity;
pub mod internship_performance;
pub mod internship_placement;
pub mod lecturer_development;
pub mod project_deployment;
pub mod project_quality;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::errors::{KpiError, KpiResult};
use crate::domain::models::{
    CollectedRecord, CollectionScope, DepartmentId, EngineConfig, Metric, SessionId,
    DEFAULT_THRESHOLD,
};
use crate::domain::ports::Collector;
use crate::services::collectors::gather;

pub use course_delivery::CourseDeliveryCalculator;
pub use event_participation::EventParticipationCalculator;
pub use feedback::FeedbackCalculator;
pub use github_activity::GitHubActivityCalculator;
pub use internship_performance::InternshipPerformanceCalculator;
pub use internship_placement::InternshipPlacementCalculator;
pub use lecturer_development::LecturerDevelopmentCalculator;
pub use project_deployment::ProjectDeploymentCalculator;
pub use project_quality::ProjectQualityCalculator;

/// A collector plus the timeout every invocation of it runs under.
#[derive(Clone)]
pub struct RecordSource {
    collector: Arc<dyn Collector>,
    timeout: Duration,
}

impl RecordSource {
    /// Source over `collector`, bounded by `timeout` per call.
    pub fn new(collector: Arc<dyn Collector>, timeout: Duration) -> Self {
        Self { collector, timeout }
    }

    /// Collector name.
    pub fn name(&self) -> &str {
        self.collector.name()
    }

    /// Validated records for the department and session.
    pub async fn records(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Vec<CollectedRecord>> {
        let scope = CollectionScope::new(department_id, session_id, self.timeout);
        Ok(gather(self.collector.as_ref(), &scope).await?.records)
    }
}

/// Targets and threshold a calculator scores its metrics with.
#[derive(Debug, Clone)]
pub struct Scoring {
    threshold: f64,
    engine: Arc<EngineConfig>,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            engine: Arc::new(EngineConfig::default()),
        }
    }
}

impl Scoring {
    /// Scoring for metrics of `pillar_name`.
    pub fn for_pillar(engine: Arc<EngineConfig>, pillar_name: &str) -> Self {
        Self {
            threshold: engine.threshold_for(pillar_name),
            engine,
        }
    }

    /// Pillar threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Configured or built-in target for `metric_name`.
    pub fn target(&self, metric_name: &str) -> f64 {
        self.engine.target_for(metric_name)
    }

    /// Score `value` as `metric_name`.
    pub fn metric(&self, metric_name: &str, value: f64) -> Metric {
        Metric::scored(metric_name, value, self.target(metric_name), self.threshold)
    }

    /// Score `value` into `metrics` under `metric_name`.
    pub fn record(&self, metrics: &mut BTreeMap<String, Metric>, metric_name: &str, value: f64) {
        metrics.insert(metric_name.to_string(), self.metric(metric_name, value));
    }
}

/// Arithmetic mean, `None` for an empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// `part` as a percentage of `whole`, `None` when `whole` is zero.
pub fn rate(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64 * 100.0)
}

/// Percentage of `records` for which `pred` holds, `None` when empty.
pub fn share(records: &[CollectedRecord], pred: impl Fn(&CollectedRecord) -> bool) -> Option<f64> {
    rate(records.iter().filter(|r| pred(r)).count(), records.len())
}

/// Ids of active students, read from student records.
pub fn active_student_ids(students: &[CollectedRecord]) -> BTreeSet<i64> {
    students
        .iter()
        .filter(|s| s.get_bool("is_active").unwrap_or(false))
        .filter_map(|s| s.get_i64("id"))
        .collect()
}

/// Turn a missing population into `InsufficientData` for `metric`.
pub fn require(
    value: Option<f64>,
    metric: &str,
    department_id: DepartmentId,
    session_id: SessionId,
) -> KpiResult<f64> {
    value.ok_or_else(|| KpiError::insufficient(metric, department_id, session_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::MetricStatus;

    #[test]
    fn mean_and_rate_handle_empty_input() {
        assert_eq!(mean(Vec::<f64>::new()), None);
        assert_eq!(mean([4.0, 5.0, 3.0]), Some(4.0));
        assert_eq!(rate(0, 0), None);
        assert_eq!(rate(1, 4), Some(25.0));
    }

    #[test]
    fn scoring_uses_pillar_threshold_and_target_overrides() {
        let mut engine = EngineConfig::default();
        engine.pillar_thresholds.insert("employability".into(), 80.0);
        engine.targets.insert("internship_placement_rate".into(), 50.0);
        let scoring = Scoring::for_pillar(Arc::new(engine), "employability");

        let metric = scoring.metric("internship_placement_rate", 45.0);
        assert_eq!(metric.target_value, 50.0);
        assert_eq!(metric.percentage_achieved, 90.0);
        assert_eq!(metric.status, MetricStatus::Meets);

        // Unlisted metric keeps its built-in target.
        assert_eq!(scoring.target("avg_internship_rating"), 4.0);
    }

    #[test]
    fn active_students_filter() {
        let students = vec![
            CollectedRecord::new().with("id", 1).with("is_active", true),
            CollectedRecord::new().with("id", 2).with("is_active", false),
            CollectedRecord::new().with("id", 3).with("is_active", true),
        ];
        assert_eq!(
            active_student_ids(&students).into_iter().collect::<Vec<_>>(),
            vec![1, 3]
        );
    }
}
