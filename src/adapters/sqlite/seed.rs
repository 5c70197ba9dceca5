//! Sample academic data for development and demos.
//!
//! Seeding is skipped when any department already exists. Everything is
//! inserted in one transaction.

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::domain::errors::KpiResult;

/// Row counts inserted by [`seed_sample_data`].
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SeedSummary {
    /// Departments inserted.
    pub departments: usize,
    /// Academic sessions inserted.
    pub sessions: usize,
    /// Lecturers inserted.
    pub lecturers: usize,
    /// Courses inserted.
    pub courses: usize,
    /// Students inserted.
    pub students: usize,
    /// Feedback entries inserted.
    pub feedback: usize,
    /// Internship records inserted.
    pub internships: usize,
    /// Student projects inserted.
    pub projects: usize,
    /// Event participations inserted.
    pub event_participants: usize,
}

/// Result of [`seed_sample_data`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Data was inserted.
    Seeded(SeedSummary),
    /// The database already had departments; nothing changed.
    AlreadySeeded,
}

type Tx = Transaction<'static, Sqlite>;

async fn insert(tx: &mut Tx, sql: &str, binds: &[Bind<'_>]) -> KpiResult<i64> {
    let mut query = sqlx::query(sql);
    for bind in binds {
        query = match bind {
            Bind::Int(v) => query.bind(*v),
            Bind::Text(v) => query.bind(*v),
            Bind::OptInt(v) => query.bind(*v),
            Bind::OptText(v) => query.bind(*v),
        };
    }
    Ok(query.execute(&mut **tx).await?.last_insert_rowid())
}

enum Bind<'a> {
    Int(i64),
    Text(&'a str),
    OptInt(Option<i64>),
    OptText(Option<&'a str>),
}

use Bind::{Int, OptInt, OptText, Text};

/// Insert the sample data set unless the database already has departments.
pub async fn seed_sample_data(pool: &SqlitePool) -> KpiResult<SeedOutcome> {
    let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM departments")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::info!(departments = existing, "Database already contains data; skipping seed");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    let department_sql =
        "INSERT INTO departments (name, code, faculty, head_of_department) VALUES (?, ?, ?, ?)";
    let cs = insert(
        &mut tx,
        department_sql,
        &[Text("Computer Science"), Text("CS"), Text("Engineering"), OptText(Some("Prof. Dr. John Smith"))],
    )
    .await?;
    let se = insert(
        &mut tx,
        department_sql,
        &[Text("Software Engineering"), Text("SE"), Text("Engineering"), OptText(Some("Prof. Dr. Jane Doe"))],
    )
    .await?;
    summary.departments = 2;

    let session_sql = "INSERT INTO academic_sessions (session_name, start_date, end_date, semester, is_active)
                       VALUES (?, ?, ?, ?, ?)";
    let first = insert(
        &mut tx,
        session_sql,
        &[Text("2023/2024"), Text("2023-09-01"), Text("2024-02-28"), Int(1), Int(1)],
    )
    .await?;
    insert(
        &mut tx,
        session_sql,
        &[Text("2023/2024"), Text("2024-03-01"), Text("2024-08-31"), Int(2), Int(0)],
    )
    .await?;
    summary.sessions = 2;

    let lecturer_sql = "INSERT INTO lecturers (name, email, department_id, uses_lms, training_sessions_attended, is_active)
                        VALUES (?, ?, ?, ?, ?, 1)";
    let alice = insert(
        &mut tx,
        lecturer_sql,
        &[Text("Dr. Alice Johnson"), Text("alice.johnson@university.edu"), Int(cs), Int(1), Int(5)],
    )
    .await?;
    let bob = insert(
        &mut tx,
        lecturer_sql,
        &[Text("Prof. Bob Williams"), Text("bob.williams@university.edu"), Int(se), Int(1), Int(3)],
    )
    .await?;
    let chidi = insert(
        &mut tx,
        lecturer_sql,
        &[Text("Dr. Chidi Eze"), Text("chidi.eze@university.edu"), Int(cs), Int(0), Int(1)],
    )
    .await?;
    summary.lecturers = 3;

    let course_sql = "INSERT INTO courses (course_code, course_title, department_id, lecturer_id, credits,
                                           has_practical_project, practical_sessions_count,
                                           theoretical_sessions_count, tools_used)
                      VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";
    let cs101 = insert(
        &mut tx,
        course_sql,
        &[
            Text("CS101"), Text("Introduction to Programming"), Int(cs), OptInt(Some(alice)), Int(3),
            Int(1), Int(15), Int(30), OptText(Some(r#"["Python","Git","VS Code"]"#)),
        ],
    )
    .await?;
    let cs201 = insert(
        &mut tx,
        course_sql,
        &[
            Text("CS201"), Text("Data Structures"), Int(cs), OptInt(Some(chidi)), Int(3),
            Int(0), Int(0), Int(30), OptText(None),
        ],
    )
    .await?;
    let se201 = insert(
        &mut tx,
        course_sql,
        &[
            Text("SE201"), Text("Software Design Patterns"), Int(se), OptInt(Some(bob)), Int(4),
            Int(1), Int(20), Int(25), OptText(Some(r#"["Java","UML","Design Patterns"]"#)),
        ],
    )
    .await?;
    summary.courses = 3;

    let outline_sql = "INSERT INTO course_outlines (course_id, academic_session_id, outline_content, is_current)
                       VALUES (?, ?, ?, 1)";
    for course in [cs101, se201] {
        insert(&mut tx, outline_sql, &[Int(course), Int(first), OptText(Some("Weekly plan"))]).await?;
    }

    let student_sql = "INSERT INTO students (matric_number, first_name, last_name, email, department_id, level,
                                             github_username, is_active)
                       VALUES (?, ?, ?, ?, ?, 300, ?, 1)";
    let john = insert(
        &mut tx,
        student_sql,
        &[Text("CSC/2021/001"), Text("John"), Text("Adeyemi"), Text("john.adeyemi@student.edu"), Int(cs), OptText(Some("johnadeyemi"))],
    )
    .await?;
    let mary = insert(
        &mut tx,
        student_sql,
        &[Text("CSC/2021/002"), Text("Mary"), Text("Okonkwo"), Text("mary.okonkwo@student.edu"), Int(cs), OptText(Some("maryokonkwo"))],
    )
    .await?;
    let ifeoma = insert(
        &mut tx,
        student_sql,
        &[Text("CSC/2021/003"), Text("Ifeoma"), Text("Nwosu"), Text("ifeoma.nwosu@student.edu"), Int(cs), OptText(None)],
    )
    .await?;
    let david = insert(
        &mut tx,
        student_sql,
        &[Text("SE/2021/001"), Text("David"), Text("Okafor"), Text("david.okafor@student.edu"), Int(se), OptText(Some("davidokafor"))],
    )
    .await?;
    insert(
        &mut tx,
        student_sql,
        &[Text("SE/2021/002"), Text("Zainab"), Text("Hassan"), Text("zainab.hassan@student.edu"), Int(se), OptText(Some("zainahassan"))],
    )
    .await?;
    summary.students = 5;

    // Computer Science, first semester: average rating 4.2.
    let feedback_sql = "INSERT INTO student_feedback (course_id, student_id, academic_session_id, rating, is_anonymous)
                        VALUES (?, ?, ?, ?, 1)";
    for (course, student, rating) in [
        (cs101, john, 4),
        (cs101, mary, 5),
        (cs101, ifeoma, 4),
        (cs201, john, 4),
        (cs201, mary, 4),
        (se201, david, 3),
    ] {
        insert(&mut tx, feedback_sql, &[Int(course), Int(student), Int(first), Int(rating)]).await?;
        summary.feedback += 1;
    }

    let internship_sql = "INSERT INTO internship_records (student_id, company_name, internship_type, start_date,
                                                          end_date, academic_session_id, duration_weeks,
                                                          performance_rating)
                          VALUES (?, ?, ?, ?, ?, ?, ?, ?)";
    for (student, company, kind, rating) in [
        (john, "Andela", "Internship", Some(4)),
        (mary, "Flutterwave", "SIWES", None),
        (david, "Paystack", "SIWES", Some(5)),
    ] {
        insert(
            &mut tx,
            internship_sql,
            &[
                Int(student), Text(company), Text(kind), Text("2023-10-02"), Text("2024-01-26"),
                Int(first), OptInt(Some(17)), OptInt(rating),
            ],
        )
        .await?;
        summary.internships += 1;
    }

    let project_sql = "INSERT INTO student_projects (student_id, project_name, github_url, is_deployed,
                                                     deployment_url, academic_session_id, project_quality_score)
                       VALUES (?, ?, ?, ?, ?, ?, ?)";
    for (student, name, deployed, url, quality) in [
        (john, "Campus Navigator", 1, Some("https://campus-nav.example.com"), Some(78)),
        (mary, "Library API", 0, None, Some(65)),
        (david, "Hostel Allocation", 1, Some("https://hostels.example.com"), Some(82)),
    ] {
        insert(
            &mut tx,
            project_sql,
            &[
                Int(student), Text(name), OptText(None), Int(deployed), OptText(url),
                Int(first), OptInt(quality),
            ],
        )
        .await?;
        summary.projects += 1;
    }

    let hackathon = insert(
        &mut tx,
        "INSERT INTO events (event_name, event_type, organizer, event_date, academic_session_id, location)
         VALUES (?, ?, ?, ?, ?, ?)",
        &[Text("Hackathon 2023"), Text("hackathon"), Text("ACM Student Chapter"), Text("2023-11-18"), Int(first), OptText(Some("Main Auditorium"))],
    )
    .await?;
    for student in [john, ifeoma, david] {
        insert(
            &mut tx,
            "INSERT INTO event_participants (event_id, student_id, participation_date) VALUES (?, ?, ?)",
            &[Int(hackathon), Int(student), Text("2023-11-18")],
        )
        .await?;
        summary.event_participants += 1;
    }

    tx.commit().await?;
    tracing::info!(?summary, "Sample data seeded");
    Ok(SeedOutcome::Seeded(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;

    #[tokio::test]
    async fn seeds_once() {
        let pool = create_migrated_test_pool().await.unwrap();

        let outcome = seed_sample_data(&pool).await.unwrap();
        let SeedOutcome::Seeded(summary) = outcome else {
            panic!("expected a fresh seed");
        };
        assert_eq!(summary.departments, 2);
        assert_eq!(summary.students, 5);
        assert_eq!(summary.feedback, 6);

        assert_eq!(
            seed_sample_data(&pool).await.unwrap(),
            SeedOutcome::AlreadySeeded
        );
    }
}
