//! Graded quality of student projects.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::{mean, require, RecordSource, Scoring};
use crate::domain::errors::KpiResult;
use crate::domain::models::{DepartmentId, Metric, SessionId};
use crate::domain::ports::Calculator;

/// Mean quality score of graded projects, 0-100.
pub const AVG_PROJECT_QUALITY: &str = "avg_project_quality";

/// Mean 0-100 quality score over graded projects in the session.
/// Ungraded projects do not count.
pub struct ProjectQualityCalculator {
    projects: RecordSource,
    scoring: Scoring,
}

impl ProjectQualityCalculator {
    /// Score graded project records with `scoring`.
    pub fn new(projects: RecordSource, scoring: Scoring) -> Self {
        Self { projects, scoring }
    }
}

#[async_trait]
impl Calculator for ProjectQualityCalculator {
    fn name(&self) -> &str {
        "project_quality"
    }

    async fn calculate(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<BTreeMap<String, Metric>> {
        let projects = self.projects.records(department_id, session_id).await?;
        let quality = require(
            mean(
                projects
                    .iter()
                    .filter_map(|p| p.get_f64("project_quality_score")),
            ),
            AVG_PROJECT_QUALITY,
            department_id,
            session_id,
        )?;

        let mut metrics = BTreeMap::new();
        self.scoring.record(&mut metrics, AVG_PROJECT_QUALITY, quality);
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::errors::KpiError;
    use crate::services::collectors::Dataset;
    use crate::services::test_support::{project, record_source, FakeDataSource};

    fn calculator(data: FakeDataSource) -> ProjectQualityCalculator {
        let data = Arc::new(data);
        ProjectQualityCalculator::new(record_source(&data, Dataset::Projects), Scoring::default())
    }

    #[tokio::test]
    async fn mean_of_graded_projects() {
        let data = FakeDataSource {
            projects: vec![
                project(1, true, Some(80)),
                project(2, false, Some(60)),
                project(3, true, None),
                project(4, false, Some(70)),
            ],
            ..FakeDataSource::with_scope()
        };

        let metrics = calculator(data).calculate(1, 1).await.unwrap();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[AVG_PROJECT_QUALITY].calculated_value, 70.0);
    }

    #[tokio::test]
    async fn ungraded_projects_are_insufficient() {
        let data = FakeDataSource {
            projects: vec![project(1, true, None)],
            ..FakeDataSource::with_scope()
        };
        let err = calculator(data).calculate(1, 1).await.unwrap_err();
        assert!(
            matches!(err, KpiError::InsufficientData { ref metric, .. } if metric == AVG_PROJECT_QUALITY)
        );
    }

    #[tokio::test]
    async fn out_of_range_quality_is_skipped() {
        let data = FakeDataSource {
            projects: vec![project(1, true, Some(90)), project(2, true, Some(140))],
            ..FakeDataSource::with_scope()
        };
        let metrics = calculator(data).calculate(1, 1).await.unwrap();
        assert_eq!(metrics[AVG_PROJECT_QUALITY].calculated_value, 90.0);
    }
}
