//! KPI snapshot domain model.
//!
//! A snapshot is a point-in-time judgment of a department's performance in
//! one academic session. It is immutable once built: fields are private and
//! only readable through accessors. A newer judgment is a new snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metric::Metric;
use super::pillar::Pillar;
use super::{DepartmentId, SessionId};

/// Arithmetic mean of every metric's `percentage_achieved` across pillars.
///
/// Returns `0.0` when there are no metrics at all.
pub fn overall_score<'a>(pillars: impl IntoIterator<Item = &'a Pillar>) -> f64 {
    let (sum, count) = pillars
        .into_iter()
        .flat_map(|p| p.metrics.iter())
        .fold((0.0_f64, 0_usize), |(sum, count), m| {
            (sum + m.percentage_achieved, count + 1)
        });

    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}

/// Immutable snapshot of all pillar results for one department and session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    academic_session_id: SessionId,
    department_id: DepartmentId,
    timestamp: DateTime<Utc>,
    pillars: BTreeMap<String, Pillar>,
    overall_score: f64,
}

impl KpiSnapshot {
    /// Assemble a snapshot, deriving the overall score from the pillars.
    pub fn assemble(
        department_id: DepartmentId,
        academic_session_id: SessionId,
        pillars: BTreeMap<String, Pillar>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let overall_score = overall_score(pillars.values());
        Self {
            academic_session_id,
            department_id,
            timestamp,
            pillars,
            overall_score,
        }
    }

    /// Rebuild a stored snapshot exactly as it was persisted.
    pub fn restore(
        department_id: DepartmentId,
        academic_session_id: SessionId,
        pillars: BTreeMap<String, Pillar>,
        timestamp: DateTime<Utc>,
        overall_score: f64,
    ) -> Self {
        Self {
            academic_session_id,
            department_id,
            timestamp,
            pillars,
            overall_score,
        }
    }

    /// Scored session.
    pub fn academic_session_id(&self) -> SessionId {
        self.academic_session_id
    }

    /// Scored department.
    pub fn department_id(&self) -> DepartmentId {
        self.department_id
    }

    /// When the build completed.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Pillars keyed by name.
    pub fn pillars(&self) -> &BTreeMap<String, Pillar> {
        &self.pillars
    }

    /// Look up a pillar by name.
    pub fn pillar(&self, name: &str) -> Option<&Pillar> {
        self.pillars.get(name)
    }

    /// Mean `percentage_achieved` over every metric; `0.0` with none.
    pub fn overall_score(&self) -> f64 {
        self.overall_score
    }

    /// All metrics, pillar by pillar in name order.
    pub fn metrics(&self) -> impl Iterator<Item = (&str, &Metric)> {
        self.pillars
            .iter()
            .flat_map(|(name, p)| p.metrics.iter().map(move |m| (name.as_str(), m)))
    }

    /// Metrics across all pillars.
    pub fn metric_count(&self) -> usize {
        self.pillars.values().map(|p| p.metrics.len()).sum()
    }

    /// True when no pillar produced a metric ("no data yet").
    pub fn is_empty(&self) -> bool {
        self.metric_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::metric::DEFAULT_THRESHOLD;

    fn pillar_with(name: &str, percentages: &[f64]) -> Pillar {
        Pillar {
            pillar_name: name.to_string(),
            metrics: percentages
                .iter()
                .enumerate()
                .map(|(i, p)| Metric::scored(format!("m{i}"), *p, 100.0, DEFAULT_THRESHOLD))
                .collect(),
        }
    }

    #[test]
    fn overall_score_is_mean_across_pillars() {
        let a = pillar_with("a", &[100.0, 120.0]);
        let b = pillar_with("b", &[80.0]);
        assert!((overall_score([&a, &b]) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn overall_score_without_metrics_is_zero() {
        assert_eq!(overall_score(std::iter::empty::<&Pillar>()), 0.0);
        let empty = Pillar::new("empty");
        let score = overall_score([&empty]);
        assert_eq!(score, 0.0);
        assert!(!score.is_nan());
    }

    #[test]
    fn assemble_derives_score_and_counts() {
        let mut pillars = BTreeMap::new();
        pillars.insert("a".to_string(), pillar_with("a", &[100.0, 120.0]));
        pillars.insert("b".to_string(), pillar_with("b", &[80.0]));

        let snapshot = KpiSnapshot::assemble(3, 7, pillars, Utc::now());

        assert_eq!(snapshot.department_id(), 3);
        assert_eq!(snapshot.academic_session_id(), 7);
        assert_eq!(snapshot.metric_count(), 3);
        assert!(!snapshot.is_empty());
        assert!((snapshot.overall_score() - 100.0).abs() < 1e-9);
        assert_eq!(snapshot.metrics().next().map(|(p, _)| p), Some("a"));
    }

    #[test]
    fn serializes_with_stable_field_names() {
        let snapshot = KpiSnapshot::assemble(1, 2, BTreeMap::new(), Utc::now());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["department_id"], 1);
        assert_eq!(json["academic_session_id"], 2);
        assert_eq!(json["overall_score"], 0.0);
        assert!(json["pillars"].as_object().unwrap().is_empty());
        assert!(json.get("timestamp").is_some());
    }
}
