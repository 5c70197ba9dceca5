//! Supervisor ratings of internships.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::{mean, require, RecordSource, Scoring};
use crate::domain::errors::KpiResult;
use crate::domain::models::{DepartmentId, Metric, SessionId};
use crate::domain::ports::Calculator;

/// Mean supervisor rating, 1-5.
pub const AVG_INTERNSHIP_RATING: &str = "avg_internship_rating";

/// Mean 1-5 performance rating over rated internships in the session.
/// Unrated internships do not count.
pub struct InternshipPerformanceCalculator {
    internships: RecordSource,
    scoring: Scoring,
}

impl InternshipPerformanceCalculator {
    /// Score internship ratings with `scoring`.
    pub fn new(internships: RecordSource, scoring: Scoring) -> Self {
        Self {
            internships,
            scoring,
        }
    }
}

#[async_trait]
impl Calculator for InternshipPerformanceCalculator {
    fn name(&self) -> &str {
        "internship_performance"
    }

    async fn calculate(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<BTreeMap<String, Metric>> {
        let internships = self.internships.records(department_id, session_id).await?;
        let avg = require(
            mean(
                internships
                    .iter()
                    .filter_map(|i| i.get_f64("performance_rating")),
            ),
            AVG_INTERNSHIP_RATING,
            department_id,
            session_id,
        )?;

        let mut metrics = BTreeMap::new();
        self.scoring.record(&mut metrics, AVG_INTERNSHIP_RATING, avg);
        Ok(metrics)
    }
}
