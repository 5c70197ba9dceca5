//! Snapshot persistence port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::KpiResult;
use crate::domain::models::{DepartmentId, KpiSnapshot, SessionId};

/// A persisted snapshot with its storage id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSnapshot {
    /// Assigned on save.
    pub id: Uuid,
    /// The snapshot as stored.
    pub snapshot: KpiSnapshot,
}

/// Repository interface for snapshot persistence.
///
/// Snapshots are append-only: there is no update or delete. Two snapshots for
/// the same department and session may coexist.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Store a snapshot atomically and return its id.
    async fn save(&self, snapshot: &KpiSnapshot) -> KpiResult<Uuid>;

    /// Most recent snapshot for the pair, by timestamp.
    async fn get_latest(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Option<StoredSnapshot>>;

    /// Every snapshot for the pair, newest first.
    async fn list(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<Vec<StoredSnapshot>>;
}
