//! Engine configuration model.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::metric::DEFAULT_THRESHOLD;

/// Main configuration structure for the KPI engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Scoring engine configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// GitHub activity collection
    #[serde(default)]
    pub github: GitHubConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".kpi/kpi.db".to_string()
}

const fn default_max_connections() -> u32 {
    10
}

impl DatabaseConfig {
    /// `sqlx` connection URL for the configured path.
    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Rotation for file logs: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Scoring engine configuration: timeouts, thresholds and targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Upper bound for a single collector invocation
    #[serde(default = "default_collector_timeout_ms")]
    pub collector_timeout_ms: u64,

    /// Percentage a metric needs to count as meeting its target
    #[serde(default = "default_threshold")]
    pub default_threshold: f64,

    /// Per-pillar overrides of `default_threshold`
    #[serde(default)]
    pub pillar_thresholds: BTreeMap<String, f64>,

    /// Per-metric target overrides; unlisted metrics use built-in targets
    #[serde(default)]
    pub targets: BTreeMap<String, f64>,
}

const fn default_collector_timeout_ms() -> u64 {
    30_000
}

const fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// Built-in target for each metric the standard calculators produce.
pub fn builtin_target(metric_name: &str) -> Option<f64> {
    let target = match metric_name {
        "avg_rating" => 4.0,
        "practical_course_ratio" => 60.0,
        "course_outline_coverage" => 100.0,
        "lms_adoption_rate" => 80.0,
        "avg_training_sessions" => 2.0,
        "internship_placement_rate" => 70.0,
        "avg_internship_rating" => 4.0,
        "deployed_project_rate" => 50.0,
        "avg_project_quality" => 70.0,
        "event_participation_rate" => 50.0,
        "github_active_rate" => 40.0,
        _ => return None,
    };
    Some(target)
}

impl EngineConfig {
    /// `collector_timeout_ms` as a [`Duration`].
    pub fn collector_timeout(&self) -> Duration {
        Duration::from_millis(self.collector_timeout_ms)
    }

    /// Threshold for a pillar, falling back to `default_threshold`.
    pub fn threshold_for(&self, pillar_name: &str) -> f64 {
        self.pillar_thresholds
            .get(pillar_name)
            .copied()
            .unwrap_or(self.default_threshold)
    }

    /// Target for a metric: configured, then built-in, then `0.0` (no target).
    pub fn target_for(&self, metric_name: &str) -> f64 {
        self.targets
            .get(metric_name)
            .copied()
            .or_else(|| builtin_target(metric_name))
            .unwrap_or(0.0)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            collector_timeout_ms: default_collector_timeout_ms(),
            default_threshold: default_threshold(),
            pillar_thresholds: BTreeMap::new(),
            targets: BTreeMap::new(),
        }
    }
}

/// GitHub activity collection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GitHubConfig {
    /// Register the GitHub activity calculator
    #[serde(default)]
    pub enabled: bool,

    /// Personal access token; unauthenticated when unset
    #[serde(default)]
    pub token: Option<String>,

    /// REST API root; overridden in tests
    #[serde(default = "default_github_api_base_url")]
    pub api_base_url: String,

    /// Sent with every request, as GitHub requires
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Client-side request rate limit
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Retry policy for transient failures
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_github_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    "kpi-engine".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            token: None,
            api_base_url: default_github_api_base_url(),
            user_agent: default_user_agent(),
            rate_limit: RateLimitConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateLimitConfig {
    /// Requests per second allowed
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,

    /// Burst size for token bucket
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,
}

const fn default_requests_per_second() -> f64 {
    1.0
}

const fn default_burst_size() -> u32 {
    10
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst_size: default_burst_size(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    500
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}
