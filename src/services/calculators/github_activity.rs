//! GitHub activity of students with a linked account.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::{require, share, RecordSource, Scoring};
use crate::domain::errors::KpiResult;
use crate::domain::models::{DepartmentId, Metric, SessionId};
use crate::domain::ports::Calculator;

/// Percentage of linked students with a push in the session.
pub const GITHUB_ACTIVE_RATE: &str = "github_active_rate";

/// Percentage of linked students with at least one push during the session.
pub struct GitHubActivityCalculator {
    activity: RecordSource,
    scoring: Scoring,
}

impl GitHubActivityCalculator {
    /// Score per-student push activity with `scoring`.
    pub fn new(activity: RecordSource, scoring: Scoring) -> Self {
        Self { activity, scoring }
    }
}

#[async_trait]
impl Calculator for GitHubActivityCalculator {
    fn name(&self) -> &str {
        "github_activity"
    }

    async fn calculate(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<BTreeMap<String, Metric>> {
        let activity = self.activity.records(department_id, session_id).await?;
        let active = require(
            share(&activity, |r| r.get_i64("push_events").unwrap_or(0) > 0),
            GITHUB_ACTIVE_RATE,
            department_id,
            session_id,
        )?;

        let mut metrics = BTreeMap::new();
        self.scoring.record(&mut metrics, GITHUB_ACTIVE_RATE, active);
        Ok(metrics)
    }
}
