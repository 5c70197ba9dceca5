//! Snapshot builder.
//!
//! Runs every pillar of a build as its own tokio task, assembles the
//! resulting pillars into a [`KpiSnapshot`] and persists it once. A fatal
//! pillar error, a cancellation or a failed save ends the build with a
//! [`SnapshotBuildError`]; nothing is persisted in the first two cases.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;

use super::pillar_aggregator::PillarAggregator;
use crate::domain::errors::SnapshotBuildError;
use crate::domain::models::{DepartmentId, KpiSnapshot, Pillar, SessionId};
use crate::domain::ports::SnapshotRepository;

/// Runs pillars for one build and persists the resulting snapshot.
pub struct SnapshotBuilder {
    repository: Arc<dyn SnapshotRepository>,
}

/// Aborts every still-running pillar task when dropped.
struct PillarTasks(Vec<AbortHandle>);

impl Drop for PillarTasks {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

impl SnapshotBuilder {
    /// Builder saving through `repository`.
    pub fn new(repository: Arc<dyn SnapshotRepository>) -> Self {
        Self { repository }
    }

    /// Run `pillars` for the department and session, then persist the
    /// snapshot.
    ///
    /// Pillar names must be unique. `cancel` is observed while pillars run;
    /// once cancelled, outstanding pillar tasks are aborted and the build
    /// returns [`SnapshotBuildError::Cancelled`].
    pub async fn build(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
        pillars: &[Arc<PillarAggregator>],
        cancel: &CancellationToken,
    ) -> Result<KpiSnapshot, SnapshotBuildError> {
        let mut names = BTreeSet::new();
        for aggregator in pillars {
            if !names.insert(aggregator.pillar_name()) {
                return Err(SnapshotBuildError::DuplicatePillar(
                    aggregator.pillar_name().to_string(),
                ));
            }
        }

        let total_pillars = pillars.len();
        if cancel.is_cancelled() {
            return Err(SnapshotBuildError::Cancelled {
                completed_pillars: 0,
                total_pillars,
            });
        }

        tracing::info!(
            department_id,
            session_id,
            pillar_count = total_pillars,
            "Starting snapshot build"
        );
        let build_start = Instant::now();

        let semaphore = Arc::new(Semaphore::new(total_pillars.max(1)));
        let mut running = FuturesUnordered::new();
        let mut tasks = PillarTasks(Vec::with_capacity(total_pillars));

        for aggregator in pillars {
            let pillar = aggregator.pillar_name().to_string();
            let aggregator = Arc::clone(aggregator);
            let semaphore = Arc::clone(&semaphore);
            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                aggregator.run(department_id, session_id).await
            });
            tasks.0.push(handle.abort_handle());
            running.push(async move { (pillar, handle.await) });
        }

        let mut completed: BTreeMap<String, Pillar> = BTreeMap::new();
        let mut omitted = 0usize;

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                next = running.next() => Some(next),
            };

            let Some(next) = next else {
                tracing::warn!(
                    department_id,
                    session_id,
                    completed_pillars = completed.len(),
                    total_pillars,
                    "Snapshot build cancelled"
                );
                return Err(SnapshotBuildError::Cancelled {
                    completed_pillars: completed.len(),
                    total_pillars,
                });
            };

            match next {
                None => break,
                Some((_, Ok(Ok(run)))) => {
                    omitted += run.omitted.len();
                    completed.insert(run.pillar.pillar_name.clone(), run.pillar);
                }
                Some((pillar, Ok(Err(source)))) => {
                    tracing::error!(
                        pillar = %pillar,
                        department_id,
                        session_id,
                        error = %source,
                        "Pillar failed; abandoning snapshot build"
                    );
                    return Err(SnapshotBuildError::PillarFailed {
                        pillar,
                        department_id,
                        session_id,
                        source,
                    });
                }
                Some((pillar, Err(join_error))) => {
                    tracing::error!(
                        pillar = %pillar,
                        error = %join_error,
                        "Pillar task did not finish"
                    );
                    return Err(SnapshotBuildError::PillarAborted {
                        pillar,
                        reason: join_error.to_string(),
                    });
                }
            }

            if cancel.is_cancelled() && completed.len() < total_pillars {
                return Err(SnapshotBuildError::Cancelled {
                    completed_pillars: completed.len(),
                    total_pillars,
                });
            }
        }

        let snapshot = KpiSnapshot::assemble(department_id, session_id, completed, Utc::now());

        let snapshot_id = self
            .repository
            .save(&snapshot)
            .await
            .map_err(|source| {
                tracing::error!(
                    department_id,
                    session_id,
                    error = %source,
                    "Failed to persist snapshot"
                );
                SnapshotBuildError::Persistence(source)
            })?;

        tracing::info!(
            %snapshot_id,
            department_id,
            session_id,
            pillar_count = snapshot.pillars().len(),
            metric_count = snapshot.metric_count(),
            omitted_calculators = omitted,
            overall_score = snapshot.overall_score(),
            duration_ms = build_start.elapsed().as_millis() as u64,
            "Snapshot built"
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::errors::{KpiError, KpiResult};
    use crate::domain::models::Metric;
    use crate::domain::ports::Calculator;
    use crate::services::test_support::MemorySnapshotRepository;

    struct Percentages(Vec<(&'static str, f64)>);

    #[async_trait]
    impl Calculator for Percentages {
        fn name(&self) -> &str {
            "percentages"
        }

        async fn calculate(
            &self,
            _department_id: DepartmentId,
            _session_id: SessionId,
        ) -> KpiResult<BTreeMap<String, Metric>> {
            Ok(self
                .0
                .iter()
                .map(|(name, pct)| (name.to_string(), Metric::scored(*name, *pct, 100.0, 100.0)))
                .collect())
        }
    }

    struct Failing;

    #[async_trait]
    impl Calculator for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn calculate(
            &self,
            _department_id: DepartmentId,
            _session_id: SessionId,
        ) -> KpiResult<BTreeMap<String, Metric>> {
            Err(KpiError::unavailable("github", "connection refused"))
        }
    }

    struct Stalled;

    #[async_trait]
    impl Calculator for Stalled {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn calculate(
            &self,
            _department_id: DepartmentId,
            _session_id: SessionId,
        ) -> KpiResult<BTreeMap<String, Metric>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(BTreeMap::new())
        }
    }

    fn pillar(name: &str, calculator: Box<dyn Calculator>) -> Arc<PillarAggregator> {
        Arc::new(PillarAggregator::new(name).with(calculator))
    }

    fn builder() -> (SnapshotBuilder, Arc<MemorySnapshotRepository>) {
        let repo = Arc::new(MemorySnapshotRepository::default());
        (SnapshotBuilder::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn overall_score_is_mean_of_all_metrics() {
        let (builder, repo) = builder();
        let pillars = vec![
            pillar("a", Box::new(Percentages(vec![("m1", 100.0), ("m2", 120.0)]))),
            pillar("b", Box::new(Percentages(vec![("m3", 80.0)]))),
        ];

        let snapshot = builder
            .build(1, 2, &pillars, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(snapshot.overall_score(), 100.0);
        assert_eq!(snapshot.pillars().len(), 2);
        assert_eq!(snapshot.department_id(), 1);
        assert_eq!(snapshot.academic_session_id(), 2);
        assert_eq!(repo.count(), 1);
    }

    #[tokio::test]
    async fn no_pillars_yields_zero_score_snapshot() {
        let (builder, repo) = builder();
        let snapshot = builder
            .build(1, 1, &[], &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(snapshot.overall_score(), 0.0);
        assert!(snapshot.is_empty());
        assert_eq!(repo.count(), 1);
    }

    #[tokio::test]
    async fn duplicate_pillar_names_are_rejected_before_running() {
        let (builder, repo) = builder();
        let pillars = vec![
            pillar("a", Box::new(Percentages(vec![("m1", 100.0)]))),
            pillar("a", Box::new(Percentages(vec![("m2", 100.0)]))),
        ];

        let err = builder
            .build(1, 1, &pillars, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, SnapshotBuildError::DuplicatePillar(ref name) if name == "a"));
        assert_eq!(repo.count(), 0);
    }

    #[tokio::test]
    async fn fatal_pillar_error_persists_nothing() {
        let (builder, repo) = builder();
        let pillars = vec![
            pillar("ok", Box::new(Percentages(vec![("m1", 100.0)]))),
            pillar("engagement", Box::new(Failing)),
        ];

        let err = builder
            .build(1, 1, &pillars, &CancellationToken::new())
            .await
            .unwrap_err();

        match &err {
            SnapshotBuildError::PillarFailed { pillar, .. } => assert_eq!(pillar, "engagement"),
            other => panic!("expected PillarFailed, got {other:?}"),
        }
        assert!(matches!(
            err.root_cause(),
            Some(KpiError::DataSourceUnavailable { .. })
        ));
        assert_eq!(repo.count(), 0);
    }

    #[tokio::test]
    async fn persistence_failure_is_reported() {
        let repo = Arc::new(MemorySnapshotRepository::failing());
        let builder = SnapshotBuilder::new(repo);

        let err = builder
            .build(1, 1, &[], &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, SnapshotBuildError::Persistence(KpiError::Database(_))));
    }

    #[tokio::test]
    async fn cancellation_aborts_outstanding_pillars() {
        let (builder, repo) = builder();
        let pillars = vec![
            pillar("fast", Box::new(Percentages(vec![("m1", 100.0)]))),
            pillar("slow", Box::new(Stalled)),
        ];
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = builder.build(1, 1, &pillars, &cancel).await.unwrap_err();

        match err {
            SnapshotBuildError::Cancelled {
                completed_pillars,
                total_pillars,
            } => {
                assert_eq!(completed_pillars, 1);
                assert_eq!(total_pillars, 2);
            }
            other => panic!("expected Cancelled, got {other:?}"),
        }
        assert_eq!(repo.count(), 0);
    }

    #[tokio::test]
    async fn already_cancelled_build_runs_nothing() {
        let (builder, repo) = builder();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let pillars = vec![pillar("a", Box::new(Percentages(vec![("m1", 100.0)])))];
        let err = builder.build(1, 1, &pillars, &cancel).await.unwrap_err();

        assert!(matches!(
            err,
            SnapshotBuildError::Cancelled {
                completed_pillars: 0,
                total_pillars: 1
            }
        ));
        assert_eq!(repo.count(), 0);
    }
}
