//! External collector for students' GitHub push activity.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::validation::is_valid_github_username;
use crate::adapters::github::GitHubClient;
use crate::domain::errors::{KpiError, KpiResult};
use crate::domain::models::{CollectedRecord, CollectionScope, RecordCheck};
use crate::domain::ports::{AcademicDataSource, Collector};

/// Collects one record per active student with a GitHub username.
///
/// Records carry `student_id`, `username`, `user_found` and `push_events`
/// (pushes during the session's date range). Malformed usernames are not
/// queried and fail validation.
pub struct GitHubActivityCollector {
    source: Arc<dyn AcademicDataSource>,
    client: GitHubClient,
}

impl GitHubActivityCollector {
    /// Collector resolving students through `source` and events through `client`.
    pub fn new(source: Arc<dyn AcademicDataSource>, client: GitHubClient) -> Self {
        Self { source, client }
    }
}

#[async_trait]
impl Collector for GitHubActivityCollector {
    fn name(&self) -> &str {
        "github:push_activity"
    }

    async fn collect(&self, scope: &CollectionScope) -> KpiResult<Vec<CollectedRecord>> {
        let session = self
            .source
            .academic_session(scope.session_id)
            .await?
            .ok_or_else(|| KpiError::NotFound {
                entity: "academic_session".to_string(),
                id: scope.session_id,
            })?;
        let (start, end) = session.date_range()?;

        let students = self.source.students(scope.department_id).await?;
        let mut records = Vec::new();
        for student in students.into_iter().filter(|s| s.is_active) {
            let Some(username) = student.github_username else {
                continue;
            };
            let mut record = CollectedRecord::new()
                .with("student_id", student.id)
                .with("username", username.clone());

            if is_valid_github_username(&username) {
                let activity = self.client.push_activity(&username, start, end).await?;
                record.insert("user_found", activity.user_found);
                record.insert("push_events", activity.push_events);
            } else {
                record.insert("user_found", false);
                record.insert("push_events", Value::Null);
            }
            records.push(record);
        }
        Ok(records)
    }

    fn validate(&self, record: &CollectedRecord) -> RecordCheck {
        match record.get_str("username") {
            Some(username) if is_valid_github_username(username) => {}
            _ => return RecordCheck::invalid("username is not a valid GitHub username"),
        }
        match record.get_i64("push_events") {
            Some(count) if count >= 0 => RecordCheck::Valid,
            _ => RecordCheck::invalid("push_events is missing or negative"),
        }
    }
}
