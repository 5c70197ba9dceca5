//! Pillar domain model.

use serde::{Deserialize, Serialize};

use super::metric::Metric;

/// Well-known pillar names used by the standard catalog.
pub mod names {
    /// Feedback and course delivery.
    pub const ACADEMIC_QUALITY: &str = "academic_quality";
    /// Lecturer tooling and training.
    pub const TEACHING_CAPACITY: &str = "teaching_capacity";
    /// Internships and projects.
    pub const EMPLOYABILITY: &str = "employability";
    /// Events and GitHub activity.
    pub const STUDENT_ENGAGEMENT: &str = "student_engagement";
}

/// A named grouping of related metrics.
///
/// Metric order is the order in which the pillar's calculators were
/// registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pillar {
    /// Unique within a snapshot.
    pub pillar_name: String,
    /// Metrics in calculator registration order.
    pub metrics: Vec<Metric>,
}

impl Pillar {
    /// Pillar with no metrics.
    pub fn new(pillar_name: impl Into<String>) -> Self {
        Self {
            pillar_name: pillar_name.into(),
            metrics: Vec::new(),
        }
    }

    /// True when no calculator contributed a metric.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Look up a metric by name.
    pub fn metric(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.metric_name == name)
    }
}

/// A calculator whose metrics were left out of a pillar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OmittedMetric {
    /// Calculator name.
    pub calculator: String,
    /// The `InsufficientData` message.
    pub reason: String,
}

/// Result of running one pillar: the pillar plus what was omitted from it.
#[derive(Debug, Clone, PartialEq)]
pub struct PillarRun {
    /// Metrics that were computed.
    pub pillar: Pillar,
    /// Calculators skipped for lack of data.
    pub omitted: Vec<OmittedMetric>,
}
