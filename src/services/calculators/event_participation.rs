//! Student participation in departmental events.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;

use super::{active_student_ids, rate, require, RecordSource, Scoring};
use crate::domain::errors::KpiResult;
use crate::domain::models::{DepartmentId, Metric, SessionId};
use crate::domain::ports::Calculator;

/// Percentage of active students who attended an event.
pub const EVENT_PARTICIPATION_RATE: &str = "event_participation_rate";

/// Percentage of active students who took part in at least one event
/// during the session.
pub struct EventParticipationCalculator {
    students: RecordSource,
    participations: RecordSource,
    scoring: Scoring,
}

impl EventParticipationCalculator {
    /// Participation over `students`, counting those present in `participations`.
    pub fn new(students: RecordSource, participations: RecordSource, scoring: Scoring) -> Self {
        Self {
            students,
            participations,
            scoring,
        }
    }
}

#[async_trait]
impl Calculator for EventParticipationCalculator {
    fn name(&self) -> &str {
        "event_participation"
    }

    async fn calculate(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<BTreeMap<String, Metric>> {
        let students = self.students.records(department_id, session_id).await?;
        let active = active_student_ids(&students);

        let participants: BTreeSet<i64> = self
            .participations
            .records(department_id, session_id)
            .await?
            .iter()
            .filter_map(|p| p.get_i64("student_id"))
            .filter(|id| active.contains(id))
            .collect();

        let participation = require(
            rate(participants.len(), active.len()),
            EVENT_PARTICIPATION_RATE,
            department_id,
            session_id,
        )?;

        let mut metrics = BTreeMap::new();
        self.scoring
            .record(&mut metrics, EVENT_PARTICIPATION_RATE, participation);
        Ok(metrics)
    }
}
