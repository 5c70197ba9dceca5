//! SQLite implementation of the AcademicDataSource port.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::KpiResult;
use crate::domain::models::{
    AcademicSession, CourseDelivery, Department, DepartmentId, EventParticipation,
    FeedbackEntry, InternshipRecord, Lecturer, SessionId, Student, StudentProject,
};
use crate::domain::ports::AcademicDataSource;

/// [`AcademicDataSource`] over the academic tables.
#[derive(Clone)]
pub struct SqliteAcademicDataSource {
    pool: SqlitePool,
}

impl SqliteAcademicDataSource {
    /// Data source reading through `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AcademicDataSource for SqliteAcademicDataSource {
    async fn department(&self, department_id: DepartmentId) -> KpiResult<Option<Department>> {
        let row = sqlx::query_as(
            "SELECT id, name, code, faculty, head_of_department FROM departments WHERE id = ?",
        )
        .bind(department_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn academic_session(&self, session_id: SessionId) -> KpiResult<Option<AcademicSession>> {
        let row = sqlx::query_as(
            "SELECT id, session_name, start_date, end_date, semester, is_active
             FROM academic_sessions WHERE id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn students(&self, department_id: DepartmentId) -> KpiResult<Vec<Student>> {
        let rows = sqlx::query_as(
            "SELECT id, matric_number, first_name, last_name, email, department_id, level,
                    github_username, is_active
             FROM students WHERE department_id = ? ORDER BY id",
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn lecturers(&self, department_id: DepartmentId) -> KpiResult<Vec<Lecturer>> {
        let rows = sqlx::query_as(
            "SELECT id, name, email, department_id, uses_lms, training_sessions_attended, is_active
             FROM lecturers WHERE department_id = ? ORDER BY id",
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn courses(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Vec<CourseDelivery>> {
        let rows = sqlx::query_as(
            r#"SELECT c.id, c.course_code, c.course_title, c.department_id, c.lecturer_id,
                      c.credits, c.has_practical_project, c.practical_sessions_count,
                      c.theoretical_sessions_count,
                      EXISTS (
                          SELECT 1 FROM course_outlines o
                          WHERE o.course_id = c.id
                            AND o.academic_session_id = ?
                            AND o.is_current = 1
                      ) AS has_current_outline
               FROM courses c
               WHERE c.department_id = ?
               ORDER BY c.id"#,
        )
        .bind(session_id)
        .bind(department_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn feedback(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Vec<FeedbackEntry>> {
        let rows = sqlx::query_as(
            r#"SELECT f.id, f.course_id, f.student_id, f.academic_session_id, f.rating, f.is_anonymous
               FROM student_feedback f
               JOIN courses c ON c.id = f.course_id
               WHERE c.department_id = ? AND f.academic_session_id = ?
               ORDER BY f.id"#,
        )
        .bind(department_id)
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn internships(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Vec<InternshipRecord>> {
        let rows = sqlx::query_as(
            r#"SELECT i.id, i.student_id, i.company_name, i.internship_type, i.start_date,
                      i.end_date, i.academic_session_id, i.duration_weeks, i.performance_rating
               FROM internship_records i
               JOIN students s ON s.id = i.student_id
               WHERE s.department_id = ? AND i.academic_session_id = ?
               ORDER BY i.id"#,
        )
        .bind(department_id)
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn event_participations(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Vec<EventParticipation>> {
        let rows = sqlx::query_as(
            r#"SELECT e.id AS event_id, e.event_name, e.event_type, e.event_date,
                      p.student_id, p.participation_date
               FROM event_participants p
               JOIN events e ON e.id = p.event_id
               JOIN students s ON s.id = p.student_id
               WHERE s.department_id = ? AND e.academic_session_id = ?
               ORDER BY p.id"#,
        )
        .bind(department_id)
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn projects(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Vec<StudentProject>> {
        let rows = sqlx::query_as(
            r#"SELECT p.id, p.student_id, p.project_name, p.github_url, p.is_deployed,
                      p.deployment_url, p.academic_session_id, p.project_quality_score
               FROM student_projects p
               JOIN students s ON s.id = p.student_id
               WHERE s.department_id = ? AND p.academic_session_id = ?
               ORDER BY p.id"#,
        )
        .bind(department_id)
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
