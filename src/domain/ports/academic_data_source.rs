//! Data-access port for stored academic entities.

use async_trait::async_trait;

use crate::domain::errors::KpiResult;
use crate::domain::models::{
    AcademicSession, CourseDelivery, Department, DepartmentId, EventParticipation,
    FeedbackEntry, InternshipRecord, Lecturer, SessionId, Student, StudentProject,
};

/// Read-only queries the collectors run against stored entities.
///
/// Every list is returned in ascending id order so repeated reads of
/// unchanged data are identical. Implementations never write.
#[async_trait]
pub trait AcademicDataSource: Send + Sync {
    /// Department by id, `None` when absent.
    async fn department(&self, department_id: DepartmentId) -> KpiResult<Option<Department>>;

    /// Academic session by id, `None` when absent.
    async fn academic_session(&self, session_id: SessionId) -> KpiResult<Option<AcademicSession>>;

    /// Students enrolled in the department (active and inactive).
    async fn students(&self, department_id: DepartmentId) -> KpiResult<Vec<Student>>;

    /// Lecturers of the department (active and inactive).
    async fn lecturers(&self, department_id: DepartmentId) -> KpiResult<Vec<Lecturer>>;

    /// Department courses, flagged with whether a current outline exists for
    /// the session.
    async fn courses(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Vec<CourseDelivery>>;

    /// Feedback on the department's courses submitted in the session.
    async fn feedback(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Vec<FeedbackEntry>>;

    /// Internships of the department's students in the session.
    async fn internships(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Vec<InternshipRecord>>;

    /// Event participations of the department's students in the session.
    async fn event_participations(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Vec<EventParticipation>>;

    /// Projects of the department's students in the session.
    async fn projects(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Vec<StudentProject>>;
}
