//! In-memory fixtures for service unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::{KpiError, KpiResult};
use crate::domain::models::{
    AcademicSession, CourseDelivery, Department, DepartmentId, EventParticipation,
    FeedbackEntry, InternshipRecord, KpiSnapshot, Lecturer, SessionId, Student, StudentProject,
};
use crate::domain::ports::{AcademicDataSource, SnapshotRepository, StoredSnapshot};

/// Data source backed by plain vectors.
///
/// Department filtering applies to students, lecturers and courses; the
/// session-scoped lists are returned as-is.
#[derive(Debug, Default, Clone)]
pub struct FakeDataSource {
    pub departments: Vec<Department>,
    pub sessions: Vec<AcademicSession>,
    pub students: Vec<Student>,
    pub lecturers: Vec<Lecturer>,
    pub courses: Vec<CourseDelivery>,
    pub feedback: Vec<FeedbackEntry>,
    pub internships: Vec<InternshipRecord>,
    pub events: Vec<EventParticipation>,
    pub projects: Vec<StudentProject>,
    /// When set, every list query fails with this error.
    pub failure: Option<KpiError>,
}

impl FakeDataSource {
    fn check(&self) -> KpiResult<()> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Department 1 and session 1 (2023-09-01 to 2024-07-31).
    pub fn with_scope() -> Self {
        Self {
            departments: vec![department(1)],
            sessions: vec![session(1)],
            ..Self::default()
        }
    }
}

#[async_trait]
impl AcademicDataSource for FakeDataSource {
    async fn department(&self, department_id: DepartmentId) -> KpiResult<Option<Department>> {
        Ok(self
            .departments
            .iter()
            .find(|d| d.id == department_id)
            .cloned())
    }

    async fn academic_session(&self, session_id: SessionId) -> KpiResult<Option<AcademicSession>> {
        Ok(self.sessions.iter().find(|s| s.id == session_id).cloned())
    }

    async fn students(&self, department_id: DepartmentId) -> KpiResult<Vec<Student>> {
        self.check()?;
        Ok(self
            .students
            .iter()
            .filter(|s| s.department_id == department_id)
            .cloned()
            .collect())
    }

    async fn lecturers(&self, department_id: DepartmentId) -> KpiResult<Vec<Lecturer>> {
        self.check()?;
        Ok(self
            .lecturers
            .iter()
            .filter(|l| l.department_id == department_id)
            .cloned()
            .collect())
    }

    async fn courses(
        &self,
        department_id: DepartmentId,
        _session_id: SessionId,
    ) -> KpiResult<Vec<CourseDelivery>> {
        self.check()?;
        Ok(self
            .courses
            .iter()
            .filter(|c| c.department_id == department_id)
            .cloned()
            .collect())
    }

    async fn feedback(
        &self,
        _department_id: DepartmentId,
        _session_id: SessionId,
    ) -> KpiResult<Vec<FeedbackEntry>> {
        self.check()?;
        Ok(self.feedback.clone())
    }

    async fn internships(
        &self,
        _department_id: DepartmentId,
        _session_id: SessionId,
    ) -> KpiResult<Vec<InternshipRecord>> {
        self.check()?;
        Ok(self.internships.clone())
    }

    async fn event_participations(
        &self,
        _department_id: DepartmentId,
        _session_id: SessionId,
    ) -> KpiResult<Vec<EventParticipation>> {
        self.check()?;
        Ok(self.events.clone())
    }

    async fn projects(
        &self,
        _department_id: DepartmentId,
        _session_id: SessionId,
    ) -> KpiResult<Vec<StudentProject>> {
        self.check()?;
        Ok(self.projects.clone())
    }
}

/// Snapshot repository that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemorySnapshotRepository {
    pub saved: Mutex<Vec<StoredSnapshot>>,
    pub fail_saves: bool,
}

impl MemorySnapshotRepository {
    pub fn failing() -> Self {
        Self {
            saved: Mutex::default(),
            fail_saves: true,
        }
    }

    pub fn count(&self) -> usize {
        self.saved.lock().unwrap().len()
    }
}

#[async_trait]
impl SnapshotRepository for MemorySnapshotRepository {
    async fn save(&self, snapshot: &KpiSnapshot) -> KpiResult<Uuid> {
        if self.fail_saves {
            return Err(KpiError::Database("disk I/O error".into()));
        }
        let id = Uuid::new_v4();
        self.saved.lock().unwrap().push(StoredSnapshot {
            id,
            snapshot: snapshot.clone(),
        });
        Ok(id)
    }

    async fn get_latest(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Option<StoredSnapshot>> {
        Ok(self.list(department_id, session_id).await?.into_iter().next())
    }

    async fn list(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Vec<StoredSnapshot>> {
        let mut matching: Vec<StoredSnapshot> = self
            .saved
            .lock()
            .unwrap()
            .iter()
            .filter(|s| {
                s.snapshot.department_id() == department_id
                    && s.snapshot.academic_session_id() == session_id
            })
            .cloned()
            .collect();
        matching.sort_by_key(|s| std::cmp::Reverse(s.snapshot.timestamp()));
        Ok(matching)
    }
}

pub fn department(id: DepartmentId) -> Department {
    Department {
        id,
        name: "Computer Science".into(),
        code: "CSC".into(),
        faculty: "Science".into(),
        head_of_department: None,
    }
}

pub fn session(id: SessionId) -> AcademicSession {
    AcademicSession {
        id,
        session_name: "2023/2024".into(),
        start_date: "2023-09-01".into(),
        end_date: "2024-07-31".into(),
        semester: 1,
        is_active: true,
    }
}

pub fn student(id: i64, github: Option<&str>) -> Student {
    Student {
        id,
        matric_number: format!("CSC/2021/{id:03}"),
        first_name: "Ada".into(),
        last_name: "Obi".into(),
        email: format!("student{id}@uni.edu.ng"),
        department_id: 1,
        level: 300,
        github_username: github.map(str::to_string),
        is_active: true,
    }
}

pub fn lecturer(id: i64, uses_lms: bool, trainings: i64) -> Lecturer {
    Lecturer {
        id,
        name: format!("Dr. Lecturer {id}"),
        email: format!("lecturer{id}@uni.edu.ng"),
        department_id: 1,
        uses_lms,
        training_sessions_attended: trainings,
        is_active: true,
    }
}

pub fn course(id: i64, practical: bool, outline: bool) -> CourseDelivery {
    CourseDelivery {
        id,
        course_code: format!("CSC{}", 300 + id),
        course_title: format!("Course {id}"),
        department_id: 1,
        lecturer_id: None,
        credits: 3,
        has_practical_project: practical,
        practical_sessions_count: if practical { 4 } else { 0 },
        theoretical_sessions_count: 10,
        has_current_outline: outline,
    }
}

pub fn feedback(id: i64, rating: i64) -> FeedbackEntry {
    FeedbackEntry {
        id,
        course_id: 1,
        student_id: id,
        academic_session_id: 1,
        rating,
        is_anonymous: true,
    }
}

pub fn internship(id: i64, student_id: i64, rating: Option<i64>) -> InternshipRecord {
    InternshipRecord {
        id,
        student_id,
        company_name: "Interswitch".into(),
        internship_type: "SIWES".into(),
        start_date: "2024-01-08".into(),
        end_date: "2024-04-05".into(),
        academic_session_id: 1,
        duration_weeks: Some(12),
        performance_rating: rating,
    }
}

pub fn participation(event_id: i64, student_id: i64) -> EventParticipation {
    EventParticipation {
        event_id,
        event_name: "Hackathon".into(),
        event_type: "hackathon".into(),
        event_date: "2024-03-02".into(),
        student_id,
        participation_date: "2024-03-02".into(),
    }
}

pub fn project(id: i64, deployed: bool, quality: Option<i64>) -> StudentProject {
    StudentProject {
        id,
        student_id: id,
        project_name: format!("Project {id}"),
        github_url: None,
        is_deployed: deployed,
        deployment_url: None,
        academic_session_id: 1,
        project_quality_score: quality,
    }
}

/// Database-backed record source over a fake data source.
pub fn record_source(
    data: &std::sync::Arc<FakeDataSource>,
    dataset: crate::services::collectors::Dataset,
) -> crate::services::calculators::RecordSource {
    let source: std::sync::Arc<dyn AcademicDataSource> = data.clone();
    crate::services::calculators::RecordSource::new(
        std::sync::Arc::new(crate::services::collectors::DatabaseCollector::new(
            dataset, source,
        )),
        std::time::Duration::from_secs(5),
    )
}
