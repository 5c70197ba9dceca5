//! Academic entities read by the engine.
//!
//! These mirror the stored rows. Dates are kept as the stored `YYYY-MM-DD`
//! text; collectors decide whether a row's dates are usable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DepartmentId, SessionId};
use crate::domain::errors::{KpiError, KpiResult};

/// Date format used by every stored date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Academic department; the unit snapshots are produced for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Department {
    /// Row id.
    pub id: DepartmentId,
    /// Full name, e.g. `Computer Science`.
    pub name: String,
    /// Short unique code, e.g. `CS`.
    pub code: String,
    /// Owning faculty.
    pub faculty: String,
    /// Head of department, when recorded.
    pub head_of_department: Option<String>,
}

/// One semester of an academic year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AcademicSession {
    /// Row id.
    pub id: SessionId,
    /// e.g. `2023/2024`
    pub session_name: String,
    /// First day, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day, `YYYY-MM-DD`.
    pub end_date: String,
    /// 1 or 2.
    pub semester: i64,
    /// Whether this is the current session.
    pub is_active: bool,
}

impl AcademicSession {
    /// Inclusive date range covered by the session.
    pub fn date_range(&self) -> KpiResult<(NaiveDate, NaiveDate)> {
        let start = parse_date(&self.start_date).ok_or_else(|| {
            KpiError::Validation(format!(
                "session {} has invalid start_date '{}'",
                self.id, self.start_date
            ))
        })?;
        let end = parse_date(&self.end_date).ok_or_else(|| {
            KpiError::Validation(format!(
                "session {} has invalid end_date '{}'",
                self.id, self.end_date
            ))
        })?;
        if end < start {
            return Err(KpiError::Validation(format!(
                "session {} ends before it starts",
                self.id
            )));
        }
        Ok((start, end))
    }
}

/// Enrolled student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    /// Row id.
    pub id: i64,
    /// `DEPT/YYYY/NNN`.
    pub matric_number: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact address.
    pub email: String,
    /// Home department.
    pub department_id: DepartmentId,
    /// Year level: 100, 200, 300, 400, 500.
    pub level: i64,
    /// Linked GitHub account, used for activity metrics.
    pub github_username: Option<String>,
    /// Inactive students are excluded from rate denominators.
    pub is_active: bool,
}

/// Teaching staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Lecturer {
    /// Row id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Employing department.
    pub department_id: DepartmentId,
    /// Whether the lecturer teaches through the LMS.
    pub uses_lms: bool,
    /// Professional development sessions attended.
    pub training_sessions_attended: i64,
    /// Only active lecturers are scored.
    pub is_active: bool,
}

/// A department course together with whether it has a current outline for
/// the session being scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CourseDelivery {
    /// Course row id.
    pub id: i64,
    /// e.g. `CS101`.
    pub course_code: String,
    /// Course title.
    pub course_title: String,
    /// Offering department.
    pub department_id: DepartmentId,
    /// Assigned lecturer, if any.
    pub lecturer_id: Option<i64>,
    /// Credit units.
    pub credits: i64,
    /// Whether the course includes a practical project.
    pub has_practical_project: bool,
    /// Planned practical sessions.
    pub practical_sessions_count: i64,
    /// Planned theory sessions.
    pub theoretical_sessions_count: i64,
    /// A current outline exists for the scored session.
    pub has_current_outline: bool,
}

/// One student's rating of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeedbackEntry {
    /// Row id.
    pub id: i64,
    /// Rated course.
    pub course_id: i64,
    /// Rating student.
    pub student_id: i64,
    /// Session the rating belongs to.
    pub academic_session_id: SessionId,
    /// 1-5 scale.
    pub rating: i64,
    /// Submitted without attribution.
    pub is_anonymous: bool,
}

/// Work placement undertaken by a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct InternshipRecord {
    /// Row id.
    pub id: i64,
    /// Placed student.
    pub student_id: i64,
    /// Host organisation.
    pub company_name: String,
    /// "Internship", "SIWES" or "Co-op".
    pub internship_type: String,
    /// First day, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day, `YYYY-MM-DD`.
    pub end_date: String,
    /// Session the placement counts towards.
    pub academic_session_id: SessionId,
    /// Length in weeks, when recorded.
    pub duration_weeks: Option<i64>,
    /// 1-5 scale when the supervisor rated the student.
    pub performance_rating: Option<i64>,
}

/// A student's attendance at a session event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventParticipation {
    /// Event row id.
    pub event_id: i64,
    /// Event title.
    pub event_name: String,
    /// workshop, hackathon, seminar, guest_session
    pub event_type: String,
    /// Day the event ran.
    pub event_date: String,
    /// Attending student.
    pub student_id: i64,
    /// Day attendance was recorded.
    pub participation_date: String,
}

/// Project built by a student during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudentProject {
    /// Row id.
    pub id: i64,
    /// Owning student.
    pub student_id: i64,
    /// Project title.
    pub project_name: String,
    /// Source repository.
    pub github_url: Option<String>,
    /// Whether the project is live.
    pub is_deployed: bool,
    /// Live URL when deployed.
    pub deployment_url: Option<String>,
    /// Session the project belongs to.
    pub academic_session_id: SessionId,
    /// 0-100 when graded.
    pub project_quality_score: Option<i64>,
}
