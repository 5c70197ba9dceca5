//! Command-line interface for the KPI engine.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::domain::errors::{KpiError, SnapshotBuildError};

/// Top-level arguments.
#[derive(Parser, Debug)]
#[command(name = "kpi-engine", version, about = "Departmental KPI snapshots")]
pub struct Cli {
    /// Emit machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create .kpi/config.yaml and the migrated database
    Init(commands::init::InitArgs),
    /// Insert the sample academic data set
    Seed,
    /// Produce and inspect KPI snapshots
    Snapshot(commands::snapshot::SnapshotArgs),
}

/// Print `err` and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let code = error_code(&err);
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": { "code": code, "message": format!("{err:#}") },
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", console::style("error:").red().bold());
    }
    std::process::exit(1);
}

fn error_code(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|cause| {
            cause
                .downcast_ref::<SnapshotBuildError>()
                .map(SnapshotBuildError::code)
                .or_else(|| cause.downcast_ref::<KpiError>().map(KpiError::code))
        })
        .unwrap_or("ERROR")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn parses_snapshot_produce() {
        let cli = Cli::try_parse_from([
            "kpi-engine",
            "--json",
            "snapshot",
            "produce",
            "--department",
            "1",
            "--session",
            "2",
        ])
        .unwrap();

        assert!(cli.json);
        let Commands::Snapshot(args) = cli.command else {
            panic!("expected snapshot command");
        };
        assert!(matches!(
            args.command,
            commands::snapshot::SnapshotCommand::Produce(commands::snapshot::ScopeArgs {
                department: 1,
                session: 2
            })
        ));
    }

    #[test]
    fn snapshot_requires_scope() {
        assert!(Cli::try_parse_from(["kpi-engine", "snapshot", "latest", "--department", "1"]).is_err());
    }

    #[test]
    fn error_code_looks_through_context() {
        let err: anyhow::Error = Err::<(), _>(SnapshotBuildError::UnknownDepartment(9))
            .context("Failed to produce snapshot")
            .unwrap_err();
        assert_eq!(error_code(&err), "NOT_FOUND");

        let plain = anyhow::anyhow!("boom");
        assert_eq!(error_code(&plain), "ERROR");
    }
}
