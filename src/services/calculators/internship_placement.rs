//! Internship placement of active students.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;

use super::{active_student_ids, rate, require, RecordSource, Scoring};
use crate::domain::errors::KpiResult;
use crate::domain::models::{DepartmentId, Metric, SessionId};
use crate::domain::ports::Calculator;

/// Percentage of active students with an internship.
pub const INTERNSHIP_PLACEMENT_RATE: &str = "internship_placement_rate";

/// Percentage of active students with at least one internship in the
/// session.
pub struct InternshipPlacementCalculator {
    students: RecordSource,
    internships: RecordSource,
    scoring: Scoring,
}

impl InternshipPlacementCalculator {
    /// Placement over `students`, counting those present in `internships`.
    pub fn new(students: RecordSource, internships: RecordSource, scoring: Scoring) -> Self {
        Self {
            students,
            internships,
            scoring,
        }
    }
}

#[async_trait]
impl Calculator for InternshipPlacementCalculator {
    fn name(&self) -> &str {
        "internship_placement"
    }

    async fn calculate(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<BTreeMap<String, Metric>> {
        let students = self.students.records(department_id, session_id).await?;
        let active = active_student_ids(&students);

        let placed: BTreeSet<i64> = self
            .internships
            .records(department_id, session_id)
            .await?
            .iter()
            .filter_map(|i| i.get_i64("student_id"))
            .filter(|id| active.contains(id))
            .collect();

        let placement = require(
            rate(placed.len(), active.len()),
            INTERNSHIP_PLACEMENT_RATE,
            department_id,
            session_id,
        )?;

        let mut metrics = BTreeMap::new();
        self.scoring
            .record(&mut metrics, INTERNSHIP_PLACEMENT_RATE, placement);
        Ok(metrics)
    }
}
