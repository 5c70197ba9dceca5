//! Domain models for the KPI engine.

pub mod academic;
pub mod config;
pub mod metric;
pub mod pillar;
pub mod record;
pub mod snapshot;

/// Identifier of a department row.
pub type DepartmentId = i64;

/// Identifier of an academic session row.
pub type SessionId = i64;

pub use academic::{
    AcademicSession, CourseDelivery, Department, EventParticipation, FeedbackEntry,
    InternshipRecord, Lecturer, Student, StudentProject,
};
pub use config::{
    Config, DatabaseConfig, EngineConfig, GitHubConfig, LoggingConfig, RateLimitConfig,
    RetryConfig,
};
pub use metric::{classify, percentage, Metric, MetricStatus, DEFAULT_THRESHOLD};
pub use pillar::{OmittedMetric, Pillar, PillarRun};
pub use record::{CollectedRecord, Collection, CollectionScope, RecordCheck, SkippedRecord};
pub use snapshot::{overall_score, KpiSnapshot};
