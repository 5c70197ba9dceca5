//! Implementation of the `kpi-engine seed` command.

use anyhow::{Context, Result};

use super::open_database;
use crate::adapters::sqlite::{seed_sample_data, SeedOutcome, SeedSummary};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

/// Result of `seed`.
#[derive(Debug, serde::Serialize)]
pub struct SeedOutput {
    /// False when the database already had data.
    pub seeded: bool,
    /// Inserted row counts.
    pub summary: Option<SeedSummary>,
}

impl CommandOutput for SeedOutput {
    fn to_human(&self) -> String {
        match &self.summary {
            Some(s) => format!(
                "Seeded {} departments, {} sessions, {} lecturers, {} courses, {} students,\n\
                 {} feedback entries, {} internships, {} projects, {} event participations",
                s.departments,
                s.sessions,
                s.lecturers,
                s.courses,
                s.students,
                s.feedback,
                s.internships,
                s.projects,
                s.event_participants,
            ),
            None => "Database already contains data; nothing seeded.".to_string(),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Run `seed`.
pub async fn execute(config: &Config, json_mode: bool) -> Result<()> {
    let pool = open_database(config).await?;
    let outcome = seed_sample_data(&pool)
        .await
        .context("Failed to seed sample data")?;
    pool.close().await;

    let output_data = match outcome {
        SeedOutcome::Seeded(summary) => SeedOutput {
            seeded: true,
            summary: Some(summary),
        },
        SeedOutcome::AlreadySeeded => SeedOutput {
            seeded: false,
            summary: None,
        },
    };
    output(&output_data, json_mode);
    Ok(())
}
