//! SQLite implementation of the SnapshotRepository.
//!
//! A snapshot is stored as one `kpi_snapshots` header, one
//! `kpi_snapshot_pillars` row per pillar (so empty pillars survive a round
//! trip) and one `kpi_snapshot_metrics` row per metric. All rows are written
//! in a single transaction.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};
use crate::domain::errors::{KpiError, KpiResult};
use crate::domain::models::{DepartmentId, KpiSnapshot, Metric, MetricStatus, Pillar, SessionId};
use crate::domain::ports::{SnapshotRepository, StoredSnapshot};

/// [`SnapshotRepository`] storing one header row, one row per pillar and one per metric.
#[derive(Clone)]
pub struct SqliteSnapshotRepository {
    pool: SqlitePool,
}

impl SqliteSnapshotRepository {
    /// Repository writing through `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load(&self, header: SnapshotRow) -> KpiResult<StoredSnapshot> {
        let pillar_names: Vec<(String,)> = sqlx::query_as(
            "SELECT pillar_name FROM kpi_snapshot_pillars WHERE snapshot_id = ? ORDER BY pillar_name",
        )
        .bind(&header.id)
        .fetch_all(&self.pool)
        .await?;

        let metric_rows: Vec<MetricRow> = sqlx::query_as(
            r#"SELECT pillar_name, metric_name, calculated_value, target_value,
                      percentage_achieved, status
               FROM kpi_snapshot_metrics
               WHERE snapshot_id = ?
               ORDER BY pillar_name, position"#,
        )
        .bind(&header.id)
        .fetch_all(&self.pool)
        .await?;

        let mut pillars: BTreeMap<String, Pillar> = pillar_names
            .into_iter()
            .map(|(name,)| (name.clone(), Pillar::new(name)))
            .collect();

        for row in metric_rows {
            let pillar_name = row.pillar_name.clone();
            let metric = Metric::try_from(row)?;
            pillars
                .entry(pillar_name.clone())
                .or_insert_with(|| Pillar::new(pillar_name))
                .metrics
                .push(metric);
        }

        Ok(StoredSnapshot {
            id: parse_uuid(&header.id)?,
            snapshot: KpiSnapshot::restore(
                header.department_id,
                header.academic_session_id,
                pillars,
                parse_datetime(&header.created_at)?,
                header.overall_score,
            ),
        })
    }
}

#[async_trait]
impl SnapshotRepository for SqliteSnapshotRepository {
    async fn save(&self, snapshot: &KpiSnapshot) -> KpiResult<Uuid> {
        let id = Uuid::new_v4();
        let id_text = id.to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO kpi_snapshots (id, department_id, academic_session_id, overall_score, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&id_text)
        .bind(snapshot.department_id())
        .bind(snapshot.academic_session_id())
        .bind(snapshot.overall_score())
        .bind(snapshot.timestamp().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        for (pillar_name, pillar) in snapshot.pillars() {
            sqlx::query("INSERT INTO kpi_snapshot_pillars (snapshot_id, pillar_name) VALUES (?, ?)")
                .bind(&id_text)
                .bind(pillar_name)
                .execute(&mut *tx)
                .await?;

            for (position, metric) in pillar.metrics.iter().enumerate() {
                sqlx::query(
                    r#"INSERT INTO kpi_snapshot_metrics
                       (snapshot_id, pillar_name, position, metric_name, calculated_value,
                        target_value, percentage_achieved, status)
                       VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
                )
                .bind(&id_text)
                .bind(pillar_name)
                .bind(position as i64)
                .bind(&metric.metric_name)
                .bind(metric.calculated_value)
                .bind(metric.target_value)
                .bind(metric.percentage_achieved)
                .bind(metric.status.as_str())
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        tracing::debug!(
            snapshot_id = %id,
            metric_count = snapshot.metric_count(),
            "Snapshot persisted"
        );
        Ok(id)
    }

    async fn get_latest(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Option<StoredSnapshot>> {
        let header: Option<SnapshotRow> = sqlx::query_as(
            r#"SELECT id, department_id, academic_session_id, overall_score, created_at
               FROM kpi_snapshots
               WHERE department_id = ? AND academic_session_id = ?
               ORDER BY created_at DESC, rowid DESC
               LIMIT 1"#,
        )
        .bind(department_id)
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        match header {
            Some(header) => Ok(Some(self.load(header).await?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Vec<StoredSnapshot>> {
        let headers: Vec<SnapshotRow> = sqlx::query_as(
            r#"SELECT id, department_id, academic_session_id, overall_score, created_at
               FROM kpi_snapshots
               WHERE department_id = ? AND academic_session_id = ?
               ORDER BY created_at DESC, rowid DESC"#,
        )
        .bind(department_id)
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        let mut snapshots = Vec::with_capacity(headers.len());
        for header in headers {
            snapshots.push(self.load(header).await?);
        }
        Ok(snapshots)
    }
}

#[derive(sqlx::FromRow)]
struct SnapshotRow {
    id: String,
    department_id: i64,
    academic_session_id: i64,
    overall_score: f64,
    created_at: String,
}

#[derive(sqlx::FromRow)]
struct MetricRow {
    pillar_name: String,
    metric_name: String,
    calculated_value: f64,
    target_value: f64,
    percentage_achieved: f64,
    status: String,
}

impl TryFrom<MetricRow> for Metric {
    type Error = KpiError;

    fn try_from(row: MetricRow) -> Result<Self, Self::Error> {
        let status = MetricStatus::from_str(&row.status).ok_or_else(|| {
            KpiError::Serialization(format!("Invalid metric status: {}", row.status))
        })?;

        Ok(Metric {
            metric_name: row.metric_name,
            calculated_value: row.calculated_value,
            target_value: row.target_value,
            percentage_achieved: row.percentage_achieved,
            status,
        })
    }
}
