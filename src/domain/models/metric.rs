//! Metric domain model and the shared scoring helpers.
//!
//! Every calculator scores its metrics the same way: [`percentage`] compares
//! the calculated value with its target and [`classify`] turns the percentage
//! into a [`MetricStatus`] using the pillar's threshold.

use serde::{Deserialize, Serialize};

/// Percentage at or above which a metric exceeds its target.
pub const EXCEEDS_PERCENTAGE: f64 = 110.0;

/// Threshold used when a pillar does not configure its own.
pub const DEFAULT_THRESHOLD: f64 = 100.0;

/// Classification of a metric against its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    /// At least 110% of target.
    Exceeds,
    /// At or above the pillar threshold.
    Meets,
    /// Under the pillar threshold.
    Below,
}

impl MetricStatus {
    /// Stored and serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exceeds => "exceeds",
            Self::Meets => "meets",
            Self::Below => "below",
        }
    }

    /// Parse the stored form, case-insensitively.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "exceeds" => Some(Self::Exceeds),
            "meets" => Some(Self::Meets),
            "below" => Some(Self::Below),
            _ => None,
        }
    }
}

/// Percentage of `target` achieved by `actual`.
///
/// A zero target means no target was set and scores as `0.0`.
pub fn percentage(actual: f64, target: f64) -> f64 {
    if target == 0.0 {
        return 0.0;
    }
    (actual / target) * 100.0
}

/// Classify a percentage against a threshold.
///
/// `>= 110` exceeds regardless of the threshold, `>= threshold` meets,
/// anything lower is below.
pub fn classify(percentage: f64, threshold: f64) -> MetricStatus {
    if percentage >= EXCEEDS_PERCENTAGE {
        MetricStatus::Exceeds
    } else if percentage >= threshold {
        MetricStatus::Meets
    } else {
        MetricStatus::Below
    }
}

/// A single measured quantity compared against its target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Stable name, e.g. `avg_rating`.
    pub metric_name: String,
    /// Value derived from the records, on the metric's own scale.
    pub calculated_value: f64,
    /// Target on the same scale. Zero means no target.
    pub target_value: f64,
    /// `calculated_value` as a percentage of `target_value`.
    pub percentage_achieved: f64,
    /// Classification of `percentage_achieved`.
    pub status: MetricStatus,
}

impl Metric {
    /// Score a calculated value against its target.
    ///
    /// `percentage_achieved` and `status` are always derived here so the two
    /// can never disagree with the raw values.
    pub fn scored(
        metric_name: impl Into<String>,
        calculated_value: f64,
        target_value: f64,
        threshold: f64,
    ) -> Self {
        let percentage_achieved = percentage(calculated_value, target_value);
        Self {
            metric_name: metric_name.into(),
            calculated_value,
            target_value,
            percentage_achieved,
            status: classify(percentage_achieved, threshold),
        }
    }
}
