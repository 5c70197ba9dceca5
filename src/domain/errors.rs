//! Domain errors for the KPI engine.
//!
//! [`KpiError`] is the error every collector, calculator and port returns.
//! [`SnapshotBuildError`] is the terminal error of a snapshot build: it wraps
//! whichever fatal [`KpiError`] stopped the build together with the build
//! context (pillar, department, session).

use thiserror::Error;

use crate::domain::models::{DepartmentId, SessionId};

/// Errors raised while collecting data and calculating metrics.
#[derive(Debug, Clone, Error)]
pub enum KpiError {
    /// The origin of the data could not be reached (database down, network
    /// unreachable, collector timeout). Fatal to the enclosing pillar.
    #[error("Data source unavailable: {source_name}: {reason}")]
    DataSourceUnavailable {
        /// Collector or adapter that failed.
        source_name: String,
        /// What went wrong.
        reason: String,
    },

    /// A third-party API answered, but with a failure.
    #[error("{service} error: {message}")]
    ExternalService {
        /// Service name, e.g. `github`.
        service: String,
        /// Failure reported by the service.
        message: String,
    },

    /// A metric has no underlying population for the department and session.
    #[error(
        "Insufficient data for metric '{metric}' (department {department_id}, session {session_id})"
    )]
    InsufficientData {
        /// Metric that could not be computed.
        metric: String,
        /// Department being scored.
        department_id: DepartmentId,
        /// Session being scored.
        session_id: SessionId,
    },

    /// A looked-up entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Kind of entity, e.g. `department`.
        entity: String,
        /// Requested id.
        id: i64,
    },

    /// Query or constraint failure in the store.
    #[error("Database error: {0}")]
    Database(String),

    /// A stored or received value could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Input violated a domain rule.
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl KpiError {
    /// Shorthand for [`KpiError::DataSourceUnavailable`].
    pub fn unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataSourceUnavailable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`KpiError::ExternalService`].
    pub fn external(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Shorthand for [`KpiError::InsufficientData`].
    pub fn insufficient(
        metric: impl Into<String>,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> Self {
        Self::InsufficientData {
            metric: metric.into(),
            department_id,
            session_id,
        }
    }

    /// Whether a pillar may absorb this error and continue.
    ///
    /// Only a missing metric population is recoverable; everything else means
    /// the data path itself is broken.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }

    /// Stable machine-readable code, used in CLI JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DataSourceUnavailable { .. } => "DATA_SOURCE_UNAVAILABLE",
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::InsufficientData { .. } => "INSUFFICIENT_DATA",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

/// Result alias used across the domain.
pub type KpiResult<T> = Result<T, KpiError>;

impl From<sqlx::Error> for KpiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::unavailable("database", err.to_string())
            }
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for KpiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Terminal error of a snapshot build.
///
/// Nothing is persisted when a build ends in one of these.
#[derive(Debug, Error)]
pub enum SnapshotBuildError {
    /// A pillar's calculator failed with a non-recoverable error.
    #[error(
        "Pillar '{pillar}' failed for department {department_id}, session {session_id}: {source}"
    )]
    PillarFailed {
        /// Failing pillar.
        pillar: String,
        /// Department being scored.
        department_id: DepartmentId,
        /// Session being scored.
        session_id: SessionId,
        /// Error that stopped the pillar.
        #[source]
        source: KpiError,
    },

    /// A pillar task panicked or was aborted by the runtime.
    #[error("Pillar '{pillar}' task aborted: {reason}")]
    PillarAborted {
        /// Pillar whose task ended abnormally.
        pillar: String,
        /// Join error text.
        reason: String,
    },

    /// Two aggregators share a pillar name.
    #[error("Duplicate pillar '{0}' registered for one build")]
    DuplicatePillar(String),

    /// The build's cancellation token fired.
    #[error("Snapshot build cancelled after {completed_pillars} of {total_pillars} pillars")]
    Cancelled {
        /// Pillars finished before cancellation was observed.
        completed_pillars: usize,
        /// Pillars in the build.
        total_pillars: usize,
    },

    /// No department with this id.
    #[error("Department {0} does not exist")]
    UnknownDepartment(DepartmentId),

    /// No academic session with this id.
    #[error("Academic session {0} does not exist")]
    UnknownSession(SessionId),

    /// Saving the finished snapshot failed. Not retried.
    #[error("Failed to persist snapshot: {0}")]
    Persistence(#[source] KpiError),

    /// Looking up the department or session failed.
    #[error("Failed to resolve build scope: {0}")]
    Scope(#[source] KpiError),
}

impl SnapshotBuildError {
    /// The collector/calculator/port error that ended the build, if any.
    pub fn root_cause(&self) -> Option<&KpiError> {
        match self {
            Self::PillarFailed { source, .. } | Self::Persistence(source) | Self::Scope(source) => {
                Some(source)
            }
            _ => None,
        }
    }

    /// Stable machine-readable code, preferring the root cause's code.
    pub fn code(&self) -> &'static str {
        if let Some(cause) = self.root_cause() {
            return cause.code();
        }
        match self {
            Self::Cancelled { .. } => "CANCELLED",
            Self::UnknownDepartment(_) | Self::UnknownSession(_) => "NOT_FOUND",
            Self::DuplicatePillar(_) => "INVALID_PILLARS",
            _ => "SNAPSHOT_BUILD_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_insufficient_data_is_recoverable() {
        assert!(KpiError::insufficient("avg_rating", 1, 1).is_recoverable());
        assert!(!KpiError::unavailable("database", "down").is_recoverable());
        assert!(!KpiError::external("GitHub", "500").is_recoverable());
        assert!(!KpiError::Database("locked".into()).is_recoverable());
    }

    #[test]
    fn root_cause_reaches_wrapped_error() {
        let err = SnapshotBuildError::PillarFailed {
            pillar: "employability".into(),
            department_id: 1,
            session_id: 2,
            source: KpiError::unavailable("github", "timed out"),
        };

        assert!(matches!(
            err.root_cause(),
            Some(KpiError::DataSourceUnavailable { .. })
        ));
        assert_eq!(err.code(), "DATA_SOURCE_UNAVAILABLE");
        assert!(err.to_string().contains("employability"));
    }

    #[test]
    fn cancelled_has_no_root_cause() {
        let err = SnapshotBuildError::Cancelled {
            completed_pillars: 1,
            total_pillars: 3,
        };
        assert!(err.root_cause().is_none());
        assert_eq!(err.code(), "CANCELLED");
    }

    #[test]
    fn pool_timeout_maps_to_unavailable() {
        let err: KpiError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, KpiError::DataSourceUnavailable { .. }));

        let err: KpiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, KpiError::Database(_)));
    }
}
