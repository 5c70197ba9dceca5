//! In-database collector.
//!
//! One collector type covers every stored dataset; the [`Dataset`] variant
//! decides which query runs and which validation rules apply.

use std::sync::Arc;

use async_trait::async_trait;

use super::validation::{
    is_valid_email, is_valid_matric_number, optional_int_in, require_date, require_date_order,
    require_int_in, require_text,
};
use crate::domain::errors::KpiResult;
use crate::domain::models::{CollectedRecord, CollectionScope, RecordCheck};
use crate::domain::ports::{AcademicDataSource, Collector};

/// Stored dataset a [`DatabaseCollector`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Course ratings.
    Feedback,
    /// Courses with the current-outline flag.
    Courses,
    /// Department lecturers.
    Lecturers,
    /// Department students.
    Students,
    /// Internship records.
    Internships,
    /// Event attendance.
    EventParticipation,
    /// Student projects.
    Projects,
}

impl Dataset {
    /// Name used in collector names and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feedback => "feedback",
            Self::Courses => "courses",
            Self::Lecturers => "lecturers",
            Self::Students => "students",
            Self::Internships => "internships",
            Self::EventParticipation => "event_participation",
            Self::Projects => "projects",
        }
    }
}

/// Collector reading one dataset through the [`AcademicDataSource`] port.
pub struct DatabaseCollector {
    dataset: Dataset,
    name: String,
    source: Arc<dyn AcademicDataSource>,
}

impl DatabaseCollector {
    /// Collector for `dataset` reading through `source`.
    pub fn new(dataset: Dataset, source: Arc<dyn AcademicDataSource>) -> Self {
        Self {
            dataset,
            name: format!("db:{}", dataset.as_str()),
            source,
        }
    }

    /// The dataset read.
    pub fn dataset(&self) -> Dataset {
        self.dataset
    }
}

fn to_records<T: serde::Serialize>(rows: &[T]) -> KpiResult<Vec<CollectedRecord>> {
    rows.iter().map(CollectedRecord::from_row).collect()
}

#[async_trait]
impl Collector for DatabaseCollector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn collect(&self, scope: &CollectionScope) -> KpiResult<Vec<CollectedRecord>> {
        let (dept, session) = (scope.department_id, scope.session_id);
        match self.dataset {
            Dataset::Feedback => to_records(&self.source.feedback(dept, session).await?),
            Dataset::Courses => to_records(&self.source.courses(dept, session).await?),
            Dataset::Lecturers => to_records(&self.source.lecturers(dept).await?),
            Dataset::Students => to_records(&self.source.students(dept).await?),
            Dataset::Internships => to_records(&self.source.internships(dept, session).await?),
            Dataset::EventParticipation => {
                to_records(&self.source.event_participations(dept, session).await?)
            }
            Dataset::Projects => to_records(&self.source.projects(dept, session).await?),
        }
    }

    fn validate(&self, record: &CollectedRecord) -> RecordCheck {
        match self.dataset {
            Dataset::Feedback => RecordCheck::all([
                require_int_in(record, "rating", 1..=5),
                require_int_in(record, "course_id", 1..=i64::MAX),
                require_int_in(record, "student_id", 1..=i64::MAX),
            ]),
            Dataset::Courses => RecordCheck::all([
                require_text(record, "course_code"),
                require_int_in(record, "practical_sessions_count", 0..=i64::MAX),
                require_int_in(record, "theoretical_sessions_count", 0..=i64::MAX),
            ]),
            Dataset::Lecturers => RecordCheck::all([
                require_text(record, "name"),
                match record.get_str("email") {
                    Some(email) if is_valid_email(email) => RecordCheck::Valid,
                    _ => RecordCheck::invalid("email is not a valid address"),
                },
                require_int_in(record, "training_sessions_attended", 0..=i64::MAX),
            ]),
            Dataset::Students => RecordCheck::all([
                match record.get_str("matric_number") {
                    Some(matric) if is_valid_matric_number(matric) => RecordCheck::Valid,
                    _ => RecordCheck::invalid("matric_number does not match DEPT/YYYY/NNN"),
                },
                match record.get_i64("level") {
                    Some(level) if (100..=700).contains(&level) && level % 100 == 0 => {
                        RecordCheck::Valid
                    }
                    _ => RecordCheck::invalid("level must be 100-700 in steps of 100"),
                },
            ]),
            Dataset::Internships => RecordCheck::all([
                require_text(record, "company_name"),
                require_date_order(record, "start_date", "end_date"),
                optional_int_in(record, "performance_rating", 1..=5),
                optional_int_in(record, "duration_weeks", 1..=104),
            ]),
            Dataset::EventParticipation => RecordCheck::all([
                require_date(record, "event_date").err().unwrap_or(RecordCheck::Valid),
                require_date(record, "participation_date")
                    .err()
                    .unwrap_or(RecordCheck::Valid),
                require_int_in(record, "student_id", 1..=i64::MAX),
            ]),
            Dataset::Projects => RecordCheck::all([
                require_text(record, "project_name"),
                optional_int_in(record, "project_quality_score", 0..=100),
            ]),
        }
    }
}
