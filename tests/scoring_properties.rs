//! Property tests for metric scoring and the overall score.

use std::collections::BTreeMap;

use chrono::Utc;
use kpi_engine::domain::models::{classify, percentage, KpiSnapshot, Metric, MetricStatus, Pillar};
use proptest::prelude::*;

fn pillar_strategy() -> impl Strategy<Value = Vec<Vec<(f64, f64)>>> {
    prop::collection::vec(
        prop::collection::vec((0.0f64..500.0, 0.1f64..500.0), 0..6),
        0..5,
    )
}

proptest! {
    #[test]
    fn status_agrees_with_percentage(value in 0.0f64..1000.0, target in 0.01f64..1000.0, threshold in 1.0f64..109.0) {
        let metric = Metric::scored("m", value, target, threshold);
        prop_assert_eq!(metric.percentage_achieved, percentage(value, target));
        let expected = if metric.percentage_achieved >= 110.0 {
            MetricStatus::Exceeds
        } else if metric.percentage_achieved >= threshold {
            MetricStatus::Meets
        } else {
            MetricStatus::Below
        };
        prop_assert_eq!(metric.status, expected);
    }

    #[test]
    fn zero_target_scores_zero(value in -1000.0f64..1000.0) {
        prop_assert_eq!(percentage(value, 0.0), 0.0);
        prop_assert_eq!(classify(0.0, 100.0), MetricStatus::Below);
    }

    #[test]
    fn overall_score_is_mean_of_all_metrics(pillars in pillar_strategy()) {
        let mut map = BTreeMap::new();
        let mut all = Vec::new();
        for (i, metrics) in pillars.iter().enumerate() {
            let mut pillar = Pillar::new(format!("p{i}"));
            for (j, (value, target)) in metrics.iter().enumerate() {
                let metric = Metric::scored(format!("m{j}"), *value, *target, 100.0);
                all.push(metric.percentage_achieved);
                pillar.metrics.push(metric);
            }
            map.insert(pillar.pillar_name.clone(), pillar);
        }

        let snapshot = KpiSnapshot::assemble(1, 1, map, Utc::now());
        if all.is_empty() {
            prop_assert_eq!(snapshot.overall_score(), 0.0);
        } else {
            let mean = all.iter().sum::<f64>() / all.len() as f64;
            prop_assert!((snapshot.overall_score() - mean).abs() < 1e-9);
            let min = all.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = all.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(snapshot.overall_score() >= min - 1e-9);
            prop_assert!(snapshot.overall_score() <= max + 1e-9);
        }
    }
}
