//! Course delivery quality: practical content and outline coverage.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::{require, share, RecordSource, Scoring};
use crate::domain::errors::KpiResult;
use crate::domain::models::{DepartmentId, Metric, SessionId};
use crate::domain::ports::Calculator;

/// Percentage of courses with a practical project.
pub const PRACTICAL_COURSE_RATIO: &str = "practical_course_ratio";
/// Percentage of courses with a current outline.
pub const COURSE_OUTLINE_COVERAGE: &str = "course_outline_coverage";

/// Share of department courses with a practical project, and share with a
/// current outline for the session.
pub struct CourseDeliveryCalculator {
    courses: RecordSource,
    scoring: Scoring,
}

impl CourseDeliveryCalculator {
    /// Score course records with `scoring`.
    pub fn new(courses: RecordSource, scoring: Scoring) -> Self {
        Self { courses, scoring }
    }
}

#[async_trait]
impl Calculator for CourseDeliveryCalculator {
    fn name(&self) -> &str {
        "course_delivery"
    }

    async fn calculate(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<BTreeMap<String, Metric>> {
        let courses = self.courses.records(department_id, session_id).await?;

        let practical = require(
            share(&courses, |c| c.get_bool("has_practical_project") == Some(true)),
            PRACTICAL_COURSE_RATIO,
            department_id,
            session_id,
        )?;
        let outlined = require(
            share(&courses, |c| c.get_bool("has_current_outline") == Some(true)),
            COURSE_OUTLINE_COVERAGE,
            department_id,
            session_id,
        )?;

        let mut metrics = BTreeMap::new();
        self.scoring.record(&mut metrics, PRACTICAL_COURSE_RATIO, practical);
        self.scoring.record(&mut metrics, COURSE_OUTLINE_COVERAGE, outlined);
        Ok(metrics)
    }
}
