//! Lecturer development: LMS adoption and training attendance.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::{mean, require, share, RecordSource, Scoring};
use crate::domain::errors::KpiResult;
use crate::domain::models::{CollectedRecord, DepartmentId, Metric, SessionId};
use crate::domain::ports::Calculator;

/// Percentage of lecturers using the LMS.
pub const LMS_ADOPTION_RATE: &str = "lms_adoption_rate";
/// Mean training sessions per lecturer.
pub const AVG_TRAINING_SESSIONS: &str = "avg_training_sessions";

/// Metrics over the department's active lecturers.
pub struct LecturerDevelopmentCalculator {
    lecturers: RecordSource,
    scoring: Scoring,
}

impl LecturerDevelopmentCalculator {
    /// Score lecturer records with `scoring`.
    pub fn new(lecturers: RecordSource, scoring: Scoring) -> Self {
        Self { lecturers, scoring }
    }
}

#[async_trait]
impl Calculator for LecturerDevelopmentCalculator {
    fn name(&self) -> &str {
        "lecturer_development"
    }

    async fn calculate(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<BTreeMap<String, Metric>> {
        let active: Vec<CollectedRecord> = self
            .lecturers
            .records(department_id, session_id)
            .await?
            .into_iter()
            .filter(|l| l.get_bool("is_active").unwrap_or(false))
            .collect();

        let lms = require(
            share(&active, |l| l.get_bool("uses_lms") == Some(true)),
            LMS_ADOPTION_RATE,
            department_id,
            session_id,
        )?;
        let training = require(
            mean(
                active
                    .iter()
                    .filter_map(|l| l.get_f64("training_sessions_attended")),
            ),
            AVG_TRAINING_SESSIONS,
            department_id,
            session_id,
        )?;

        let mut metrics = BTreeMap::new();
        self.scoring.record(&mut metrics, LMS_ADOPTION_RATE, lms);
        self.scoring.record(&mut metrics, AVG_TRAINING_SESSIONS, training);
        Ok(metrics)
    }
}
