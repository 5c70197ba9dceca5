//! KPI engine: the invocation surface of the scoring pipeline.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::catalog::standard_pillars;
use super::pillar_aggregator::PillarAggregator;
use super::snapshot_builder::SnapshotBuilder;
use crate::adapters::github::GitHubClient;
use crate::domain::errors::{KpiResult, SnapshotBuildError};
use crate::domain::models::{Config, DepartmentId, KpiSnapshot, SessionId};
use crate::domain::ports::{AcademicDataSource, SnapshotRepository, StoredSnapshot};

/// Produces and reads KPI snapshots.
///
/// Holds the pillar set used for every build. [`KpiEngine::new`] wires the
/// standard catalog from configuration; [`KpiEngine::with_pillars`] accepts
/// any other set.
pub struct KpiEngine {
    data_source: Arc<dyn AcademicDataSource>,
    repository: Arc<dyn SnapshotRepository>,
    builder: SnapshotBuilder,
    pillars: Vec<Arc<PillarAggregator>>,
}

impl KpiEngine {
    /// Engine with the standard pillars.
    ///
    /// Fails only when GitHub is enabled and its HTTP client cannot be built.
    pub fn new(
        config: &Config,
        data_source: Arc<dyn AcademicDataSource>,
        repository: Arc<dyn SnapshotRepository>,
    ) -> KpiResult<Self> {
        let github = if config.github.enabled {
            Some(GitHubClient::new(&config.github)?)
        } else {
            None
        };
        let pillars = standard_pillars(&config.engine, Arc::clone(&data_source), github);
        Ok(Self::with_pillars(data_source, repository, pillars))
    }

    /// Engine with an explicit pillar set.
    pub fn with_pillars(
        data_source: Arc<dyn AcademicDataSource>,
        repository: Arc<dyn SnapshotRepository>,
        pillars: Vec<Arc<PillarAggregator>>,
    ) -> Self {
        Self {
            builder: SnapshotBuilder::new(Arc::clone(&repository)),
            data_source,
            repository,
            pillars,
        }
    }

    /// Registered pillar names, in order.
    pub fn pillar_names(&self) -> Vec<&str> {
        self.pillars.iter().map(|p| p.pillar_name()).collect()
    }

    /// Compute, persist and return a fresh snapshot.
    pub async fn produce_snapshot(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> Result<KpiSnapshot, SnapshotBuildError> {
        self.produce_snapshot_with_cancel(department_id, session_id, &CancellationToken::new())
            .await
    }

    /// [`produce_snapshot`](Self::produce_snapshot) that stops when `cancel`
    /// fires.
    pub async fn produce_snapshot_with_cancel(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
        cancel: &CancellationToken,
    ) -> Result<KpiSnapshot, SnapshotBuildError> {
        self.check_scope(department_id, session_id).await?;
        self.builder
            .build(department_id, session_id, &self.pillars, cancel)
            .await
    }

    /// Most recent stored snapshot for the pair.
    pub async fn latest_snapshot(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Option<StoredSnapshot>> {
        self.repository.get_latest(department_id, session_id).await
    }

    /// Every stored snapshot for the pair, newest first.
    pub async fn snapshot_history(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Vec<StoredSnapshot>> {
        self.repository.list(department_id, session_id).await
    }

    async fn check_scope(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> Result<(), SnapshotBuildError> {
        if self
            .data_source
            .department(department_id)
            .await
            .map_err(SnapshotBuildError::Scope)?
            .is_none()
        {
            return Err(SnapshotBuildError::UnknownDepartment(department_id));
        }
        if self
            .data_source
            .academic_session(session_id)
            .await
            .map_err(SnapshotBuildError::Scope)?
            .is_none()
        {
            return Err(SnapshotBuildError::UnknownSession(session_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::KpiError;
    use crate::domain::models::MetricStatus;
    use crate::services::test_support::{
        course, feedback, lecturer, FakeDataSource, MemorySnapshotRepository,
    };

    fn engine(data: FakeDataSource) -> (KpiEngine, Arc<MemorySnapshotRepository>) {
        let repo = Arc::new(MemorySnapshotRepository::default());
        let engine = KpiEngine::new(&Config::default(), Arc::new(data), repo.clone()).unwrap();
        (engine, repo)
    }

    #[tokio::test]
    async fn unknown_department_is_rejected() {
        let (engine, repo) = engine(FakeDataSource::with_scope());
        let err = engine.produce_snapshot(99, 1).await.unwrap_err();
        assert!(matches!(err, SnapshotBuildError::UnknownDepartment(99)));
        assert_eq!(repo.count(), 0);
    }

    #[tokio::test]
    async fn unknown_session_is_rejected() {
        let (engine, _) = engine(FakeDataSource::with_scope());
        let err = engine.produce_snapshot(1, 42).await.unwrap_err();
        assert!(matches!(err, SnapshotBuildError::UnknownSession(42)));
    }

    #[tokio::test]
    async fn department_without_data_scores_zero() {
        let (engine, repo) = engine(FakeDataSource::with_scope());
        let snapshot = engine.produce_snapshot(1, 1).await.unwrap();

        assert_eq!(snapshot.overall_score(), 0.0);
        assert_eq!(snapshot.pillars().len(), 4);
        assert!(snapshot.pillars().values().all(|p| p.is_empty()));
        assert_eq!(repo.count(), 1);
    }

    #[tokio::test]
    async fn partial_data_fills_available_pillars() {
        let data = FakeDataSource {
            feedback: vec![feedback(1, 4), feedback(2, 5)],
            courses: vec![course(1, true, true)],
            lecturers: vec![lecturer(1, true, 2)],
            ..FakeDataSource::with_scope()
        };
        let (engine, _) = engine(data);

        let snapshot = engine.produce_snapshot(1, 1).await.unwrap();

        let quality = snapshot.pillar("academic_quality").unwrap();
        let names: Vec<&str> = quality.metrics.iter().map(|m| m.metric_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["avg_rating", "course_outline_coverage", "practical_course_ratio"]
        );
        assert_eq!(
            quality.metric("avg_rating").unwrap().status,
            MetricStatus::Exceeds
        );
        assert!(snapshot.pillar("employability").unwrap().is_empty());
        assert_eq!(snapshot.metric_count(), 5);
    }

    #[tokio::test]
    async fn unavailable_store_fails_the_build() {
        let data = FakeDataSource {
            failure: Some(KpiError::unavailable("database", "pool timed out")),
            ..FakeDataSource::with_scope()
        };
        let (engine, repo) = engine(data);

        let err = engine.produce_snapshot(1, 1).await.unwrap_err();

        assert!(matches!(
            err.root_cause(),
            Some(KpiError::DataSourceUnavailable { .. })
        ));
        assert_eq!(repo.count(), 0);
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let (engine, _) = engine(FakeDataSource::with_scope());
        let first = engine.produce_snapshot(1, 1).await.unwrap();
        let second = engine.produce_snapshot(1, 1).await.unwrap();

        let history = engine.snapshot_history(1, 1).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].snapshot.timestamp() >= history[1].snapshot.timestamp());

        let latest = engine.latest_snapshot(1, 1).await.unwrap().unwrap();
        assert_eq!(latest.snapshot.timestamp(), second.timestamp().max(first.timestamp()));
    }
}
