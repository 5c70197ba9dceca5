//! Student project deployment.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::{require, share, RecordSource, Scoring};
use crate::domain::errors::KpiResult;
use crate::domain::models::{DepartmentId, Metric, SessionId};
use crate::domain::ports::Calculator;

/// Percentage of projects that are deployed.
pub const DEPLOYED_PROJECT_RATE: &str = "deployed_project_rate";

/// Share of session projects that are deployed.
pub struct ProjectDeploymentCalculator {
    projects: RecordSource,
    scoring: Scoring,
}

impl ProjectDeploymentCalculator {
    /// Score project records with `scoring`.
    pub fn new(projects: RecordSource, scoring: Scoring) -> Self {
        Self { projects, scoring }
    }
}

#[async_trait]
impl Calculator for ProjectDeploymentCalculator {
    fn name(&self) -> &str {
        "project_deployment"
    }

    async fn calculate(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<BTreeMap<String, Metric>> {
        let projects = self.projects.records(department_id, session_id).await?;
        let deployed = require(
            share(&projects, |p| p.get_bool("is_deployed") == Some(true)),
            DEPLOYED_PROJECT_RATE,
            department_id,
            session_id,
        )?;

        let mut metrics = BTreeMap::new();
        self.scoring.record(&mut metrics, DEPLOYED_PROJECT_RATE, deployed);
        Ok(metrics)
    }
}
