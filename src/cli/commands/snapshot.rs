//! Implementation of the `kpi-engine snapshot` commands.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::open_database;
use crate::adapters::sqlite::{SqliteAcademicDataSource, SqliteSnapshotRepository};
use crate::cli::output::{create_spinner, format_snapshot, output, supports_color, CommandOutput};
use crate::domain::models::{Config, DepartmentId, KpiSnapshot, SessionId};
use crate::domain::ports::StoredSnapshot;
use crate::services::KpiEngine;

/// Arguments of `snapshot`.
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Snapshot action.
    #[command(subcommand)]
    pub command: SnapshotCommand,
}

/// `snapshot` subcommands.
#[derive(Subcommand, Debug)]
pub enum SnapshotCommand {
    /// Compute and store a new snapshot
    Produce(ScopeArgs),
    /// Show the most recent stored snapshot
    Latest(ScopeArgs),
    /// List every stored snapshot, newest first
    History(ScopeArgs),
}

/// Department and session a command applies to.
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeArgs {
    /// Department id
    #[arg(long)]
    pub department: DepartmentId,

    /// Academic session id
    #[arg(long)]
    pub session: SessionId,
}

/// One snapshot, with its id once stored.
#[derive(Debug, Serialize)]
pub struct SnapshotOutput {
    /// Storage id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// The snapshot.
    pub snapshot: KpiSnapshot,
}

impl CommandOutput for SnapshotOutput {
    fn to_human(&self) -> String {
        let table = format_snapshot(&self.snapshot, supports_color());
        match self.id {
            Some(id) => format!("Snapshot {id}\n{table}"),
            None => table,
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl From<StoredSnapshot> for SnapshotOutput {
    fn from(stored: StoredSnapshot) -> Self {
        Self {
            id: Some(stored.id),
            snapshot: stored.snapshot,
        }
    }
}

/// Stored snapshots for one department and session.
#[derive(Debug, Serialize)]
pub struct HistoryOutput {
    /// Department.
    pub department_id: DepartmentId,
    /// Session.
    pub session_id: SessionId,
    /// Newest first.
    pub snapshots: Vec<SnapshotOutput>,
}

impl CommandOutput for HistoryOutput {
    fn to_human(&self) -> String {
        if self.snapshots.is_empty() {
            return format!(
                "No snapshots for department {} / session {}.",
                self.department_id, self.session_id
            );
        }
        self.snapshots
            .iter()
            .map(CommandOutput::to_human)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Run a `snapshot` subcommand.
pub async fn execute(args: SnapshotArgs, config: &Config, json_mode: bool) -> Result<()> {
    let pool = open_database(config).await?;
    let engine = KpiEngine::new(
        config,
        Arc::new(SqliteAcademicDataSource::new(pool.clone())),
        Arc::new(SqliteSnapshotRepository::new(pool.clone())),
    )
    .context("Failed to configure KPI engine")?;

    let result = match args.command {
        SnapshotCommand::Produce(scope) => produce(&engine, scope, json_mode).await,
        SnapshotCommand::Latest(scope) => latest(&engine, scope, json_mode).await,
        SnapshotCommand::History(scope) => history(&engine, scope, json_mode).await,
    };
    pool.close().await;
    result
}

async fn produce(engine: &KpiEngine, scope: ScopeArgs, json_mode: bool) -> Result<()> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling snapshot build");
            on_interrupt.cancel();
        }
    });

    let spinner = create_spinner(
        format!(
            "Computing {} pillars for department {} / session {}",
            engine.pillar_names().len(),
            scope.department,
            scope.session
        ),
        json_mode,
    );
    let built = engine
        .produce_snapshot_with_cancel(scope.department, scope.session, &cancel)
        .await;
    interrupt.abort();
    spinner.finish_and_clear();

    let snapshot = built.with_context(|| {
        format!(
            "Failed to produce snapshot for department {} / session {}",
            scope.department, scope.session
        )
    })?;
    output(&SnapshotOutput { id: None, snapshot }, json_mode);
    Ok(())
}

async fn latest(engine: &KpiEngine, scope: ScopeArgs, json_mode: bool) -> Result<()> {
    let stored = engine
        .latest_snapshot(scope.department, scope.session)
        .await
        .context("Failed to load latest snapshot")?
        .with_context(|| {
            format!(
                "No snapshot stored for department {} / session {}",
                scope.department, scope.session
            )
        })?;
    output(&SnapshotOutput::from(stored), json_mode);
    Ok(())
}

async fn history(engine: &KpiEngine, scope: ScopeArgs, json_mode: bool) -> Result<()> {
    let snapshots = engine
        .snapshot_history(scope.department, scope.session)
        .await
        .context("Failed to load snapshot history")?;
    let output_data = HistoryOutput {
        department_id: scope.department,
        session_id: scope.session,
        snapshots: snapshots.into_iter().map(SnapshotOutput::from).collect(),
    };
    output(&output_data, json_mode);
    Ok(())
}
