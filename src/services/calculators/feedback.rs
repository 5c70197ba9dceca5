//! Student feedback on course delivery.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::{mean, require, RecordSource, Scoring};
use crate::domain::errors::KpiResult;
use crate::domain::models::{DepartmentId, Metric, SessionId};
use crate::domain::ports::Calculator;

/// Mean course rating, 1-5.
pub const AVG_RATING: &str = "avg_rating";

/// `avg_rating`: mean 1-5 rating of feedback submitted in the session.
pub struct FeedbackCalculator {
    feedback: RecordSource,
    scoring: Scoring,
}

impl FeedbackCalculator {
    /// Score feedback records with `scoring`.
    pub fn new(feedback: RecordSource, scoring: Scoring) -> Self {
        Self { feedback, scoring }
    }
}

#[async_trait]
impl Calculator for FeedbackCalculator {
    fn name(&self) -> &str {
        "feedback"
    }

    async fn calculate(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<BTreeMap<String, Metric>> {
        let records = self.feedback.records(department_id, session_id).await?;
        let ratings = records.iter().filter_map(|r| r.get_f64("rating"));
        let avg = require(mean(ratings), AVG_RATING, department_id, session_id)?;

        let mut metrics = BTreeMap::new();
        self.scoring.record(&mut metrics, AVG_RATING, avg);
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::errors::KpiError;
    use crate::domain::models::MetricStatus;
    use crate::services::collectors::Dataset;
    use crate::services::test_support::{feedback, record_source, FakeDataSource};

    fn calculator(data: FakeDataSource) -> FeedbackCalculator {
        let data = Arc::new(data);
        FeedbackCalculator::new(record_source(&data, Dataset::Feedback), Scoring::default())
    }

    #[tokio::test]
    async fn average_above_target_meets() {
        // 4 + 5 + 4 + 4 + 4 = 21 / 5 = 4.2
        let data = FakeDataSource {
            feedback: vec![
                feedback(1, 4),
                feedback(2, 5),
                feedback(3, 4),
                feedback(4, 4),
                feedback(5, 4),
            ],
            ..FakeDataSource::with_scope()
        };

        let metrics = calculator(data).calculate(1, 1).await.unwrap();
        let metric = &metrics[AVG_RATING];

        assert!((metric.calculated_value - 4.2).abs() < 1e-9);
        assert_eq!(metric.target_value, 4.0);
        assert!((metric.percentage_achieved - 105.0).abs() < 1e-9);
        assert_eq!(metric.status, MetricStatus::Meets);
    }

    #[tokio::test]
    async fn out_of_scale_ratings_are_skipped() {
        let data = FakeDataSource {
            feedback: vec![feedback(1, 5), feedback(2, 9)],
            ..FakeDataSource::with_scope()
        };
        let metrics = calculator(data).calculate(1, 1).await.unwrap();
        assert_eq!(metrics[AVG_RATING].calculated_value, 5.0);
    }

    #[tokio::test]
    async fn no_feedback_is_insufficient() {
        let err = calculator(FakeDataSource::with_scope())
            .calculate(1, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, KpiError::InsufficientData { ref metric, .. } if metric == AVG_RATING));
    }

    #[tokio::test]
    async fn repeated_runs_are_identical() {
        let data = FakeDataSource {
            feedback: vec![feedback(1, 3), feedback(2, 4)],
            ..FakeDataSource::with_scope()
        };
        let calc = calculator(data);
        let first = calc.calculate(1, 1).await.unwrap();
        let second = calc.calculate(1, 1).await.unwrap();
        assert_eq!(first, second);
    }
}
