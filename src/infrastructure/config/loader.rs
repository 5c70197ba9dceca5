//! Hierarchical configuration loading and validation.

use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Directory holding project-local configuration and the default database.
pub const CONFIG_DIR: &str = ".kpi";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `logging.level` is not a known level.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// `logging.format` is not json or pretty.
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// `logging.rotation` is not daily, hourly or never.
    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    /// `database.path` is empty.
    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    /// `database.max_connections` is zero.
    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    /// `engine.collector_timeout_ms` is zero.
    #[error("Invalid collector_timeout_ms: {0}. Must be positive")]
    InvalidCollectorTimeout(u64),

    /// A pillar threshold is not a positive number.
    #[error("Invalid threshold for {0}: {1}. Must be a positive number")]
    InvalidThreshold(String, f64),

    /// A metric target is negative or not finite.
    #[error("Invalid target for {0}: {1}. Must be a non-negative number")]
    InvalidTarget(String, f64),

    /// `github.rate_limit.requests_per_second` is not positive.
    #[error("Invalid rate limit: {0}. Must be positive")]
    InvalidRateLimit(f64),

    /// `github.rate_limit.burst_size` is zero.
    #[error("Invalid burst_size: {0}. Must be at least 1")]
    InvalidBurstSize(u32),

    /// `github.retry.max_retries` is zero.
    #[error("Invalid max_retries: {0}. Cannot be 0")]
    InvalidMaxRetries(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    /// Initial backoff is not below the maximum.
    InvalidBackoff(u64, u64),

    /// Any other rule violation.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration relative to the working directory.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .kpi/config.yaml (project config, created by init)
    /// 3. .kpi/local.yaml (local overrides, optional)
    /// 4. Environment variables (KPI_* prefix, `__` separates nesting)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(Path::new("."))
    }

    /// Same as [`ConfigLoader::load`] with `.kpi/` resolved under `root`.
    pub fn load_from_dir(root: &Path) -> Result<Config> {
        let dir = root.join(CONFIG_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed("KPI_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(
                config.logging.rotation.clone(),
            ));
        }

        let engine = &config.engine;
        if engine.collector_timeout_ms == 0 {
            return Err(ConfigError::InvalidCollectorTimeout(
                engine.collector_timeout_ms,
            ));
        }

        if !is_positive(engine.default_threshold) {
            return Err(ConfigError::InvalidThreshold(
                "default".to_string(),
                engine.default_threshold,
            ));
        }
        for (pillar, threshold) in &engine.pillar_thresholds {
            if !is_positive(*threshold) {
                return Err(ConfigError::InvalidThreshold(pillar.clone(), *threshold));
            }
        }
        for (metric, target) in &engine.targets {
            if !target.is_finite() || *target < 0.0 {
                return Err(ConfigError::InvalidTarget(metric.clone(), *target));
            }
        }

        let github = &config.github;
        if github.rate_limit.requests_per_second <= 0.0 {
            return Err(ConfigError::InvalidRateLimit(
                github.rate_limit.requests_per_second,
            ));
        }

        if github.rate_limit.burst_size == 0 {
            return Err(ConfigError::InvalidBurstSize(github.rate_limit.burst_size));
        }

        if github.retry.max_retries == 0 {
            return Err(ConfigError::InvalidMaxRetries(github.retry.max_retries));
        }

        if github.retry.initial_backoff_ms >= github.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                github.retry.initial_backoff_ms,
                github.retry.max_backoff_ms,
            ));
        }

        if github.enabled && github.api_base_url.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "github.api_base_url cannot be empty when GitHub collection is enabled"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.path, ".kpi/kpi.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.engine.collector_timeout_ms, 30_000);
        assert!(!config.github.enabled);
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
database:
  path: /custom/kpi.db
  max_connections: 5
logging:
  level: debug
  format: pretty
engine:
  collector_timeout_ms: 5000
  pillar_thresholds:
    employability: 90.0
  targets:
    avg_rating: 4.5
github:
  enabled: true
  rate_limit:
    requests_per_second: 2.0
    burst_size: 5
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.database.path, "/custom/kpi.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.engine.threshold_for("employability"), 90.0);
        assert_eq!(config.engine.target_for("avg_rating"), 4.5);
        assert!(config.github.enabled);
        assert_eq!(config.github.api_base_url, "https://api.github.com");
        assert_eq!(config.github.rate_limit.burst_size, 5);

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidLogFormat(_)
        ));
    }

    #[test]
    fn test_validate_empty_database_path() {
        let mut config = Config::default();
        config.database.path = String::new();

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::EmptyDatabasePath
        ));
    }

    #[test]
    fn test_validate_zero_collector_timeout() {
        let mut config = Config::default();
        config.engine.collector_timeout_ms = 0;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidCollectorTimeout(0)
        ));
    }

    #[test]
    fn test_validate_thresholds_and_targets() {
        let mut config = Config::default();
        config
            .engine
            .pillar_thresholds
            .insert("employability".into(), 0.0);
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidThreshold(name, _) if name == "employability"
        ));

        let mut config = Config::default();
        config.engine.targets.insert("avg_rating".into(), -1.0);
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidTarget(name, _) if name == "avg_rating"
        ));
    }

    #[test]
    fn test_validate_zero_rate_limit() {
        let mut config = Config::default();
        config.github.rate_limit.requests_per_second = 0.0;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidRateLimit(_)
        ));
    }

    #[test]
    fn test_validate_invalid_backoff() {
        let mut config = Config::default();
        config.github.retry.initial_backoff_ms = 30000;
        config.github.retry.max_backoff_ms = 10000;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidBackoff(30000, 10000)
        ));
    }

    #[test]
    fn test_hierarchical_merging() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&dir).unwrap();

        let mut base = std::fs::File::create(dir.join("config.yaml")).unwrap();
        writeln!(base, "logging:\n  level: info\n  format: json\nengine:\n  collector_timeout_ms: 1000").unwrap();
        let mut local = std::fs::File::create(dir.join("local.yaml")).unwrap();
        writeln!(local, "logging:\n  level: debug").unwrap();

        let config = temp_env::with_vars(
            [
                ("KPI_ENGINE__COLLECTOR_TIMEOUT_MS", Some("2500")),
                ("KPI_LOGGING__LEVEL", None::<&str>),
            ],
            || ConfigLoader::load_from_dir(root.path()).unwrap(),
        );

        assert_eq!(config.logging.level, "debug", "local.yaml should win");
        assert_eq!(config.logging.format, "json", "Base value should persist");
        assert_eq!(
            config.engine.collector_timeout_ms, 2500,
            "Environment should win over files"
        );
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let root = tempfile::tempdir().unwrap();
        let config = temp_env::with_vars_unset(
            ["KPI_LOGGING__LEVEL", "KPI_ENGINE__COLLECTOR_TIMEOUT_MS"],
            || ConfigLoader::load_from_dir(root.path()).unwrap(),
        );
        assert_eq!(config.database.path, ".kpi/kpi.db");
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "logging:\n  format: xml").unwrap();
        file.flush().unwrap();

        assert!(ConfigLoader::load_from_file(file.path()).is_err());
    }
}
