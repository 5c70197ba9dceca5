//! Implementation of the `kpi-engine init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::fs;

use crate::adapters::sqlite::{initialize_database, PoolConfig};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::CONFIG_DIR;

/// Arguments of `init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

/// Result of `init`.
#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    /// Always true on return.
    pub success: bool,
    /// Summary line.
    pub message: String,
    /// Path of `.kpi/config.yaml`.
    pub config_path: PathBuf,
    /// False when an existing config was kept.
    pub config_written: bool,
    /// Migrated database file.
    pub database_path: PathBuf,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push(format!("Config written to {}", self.config_path.display()));
        } else {
            lines.push(format!("Kept existing config at {}", self.config_path.display()));
        }
        lines.push(format!("Database ready at {}", self.database_path.display()));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Run `init`.
pub async fn execute(args: InitArgs, config: &Config, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let kpi_dir = target_path.join(CONFIG_DIR);
    fs::create_dir_all(&kpi_dir)
        .await
        .with_context(|| format!("Failed to create {}", kpi_dir.display()))?;

    let config_path = kpi_dir.join("config.yaml");
    let config_written = args.force || !config_path.exists();
    if config_written {
        let yaml = serde_yaml::to_string(&Config::default()).context("Failed to render default config")?;
        fs::write(&config_path, yaml)
            .await
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
    }

    let database_path = target_path.join(&config.database.path);
    let database_url = format!("sqlite:{}", database_path.display());
    let pool = initialize_database(&database_url, Some(PoolConfig::from(&config.database)))
        .await
        .context("Failed to initialize database")?;
    pool.close().await;

    let output_data = InitOutput {
        success: true,
        message: "Project initialized successfully.".to_string(),
        config_path,
        config_written,
        database_path,
    };
    output(&output_data, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn init_creates_config_and_database() {
        let dir = tempfile::tempdir().unwrap();
        let args = InitArgs {
            force: false,
            path: dir.path().to_path_buf(),
        };

        execute(args, &Config::default(), true).await.unwrap();

        assert!(dir.path().join(".kpi/config.yaml").exists());
        assert!(dir.path().join(".kpi/kpi.db").exists());

        let written = std::fs::read_to_string(dir.path().join(".kpi/config.yaml")).unwrap();
        let parsed: Config = serde_yaml::from_str(&written).unwrap();
        assert_eq!(parsed.database.path, ".kpi/kpi.db");
    }
}
