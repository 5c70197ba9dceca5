//! Pillar aggregator.
//!
//! Provides [`PillarAggregator`], which runs the calculators registered under
//! one pillar name and folds their metrics into a [`Pillar`].
//!
//! Calculators run sequentially in registration order. A calculator that
//! reports `InsufficientData` is omitted from the pillar and recorded in the
//! [`PillarRun`]; any other error aborts the pillar.

use std::time::Instant;

use crate::domain::errors::KpiResult;
use crate::domain::models::{DepartmentId, OmittedMetric, Pillar, PillarRun, SessionId};
use crate::domain::ports::Calculator;

/// Ordered calculators contributing to one pillar.
pub struct PillarAggregator {
    pillar_name: String,
    calculators: Vec<Box<dyn Calculator>>,
}

impl PillarAggregator {
    /// Create an aggregator with no calculators.
    pub fn new(pillar_name: impl Into<String>) -> Self {
        Self {
            pillar_name: pillar_name.into(),
            calculators: Vec::new(),
        }
    }

    /// Pillar this aggregator produces.
    pub fn pillar_name(&self) -> &str {
        &self.pillar_name
    }

    /// Append a calculator. Its metrics follow those of earlier calculators.
    pub fn register(&mut self, calculator: Box<dyn Calculator>) {
        self.calculators.push(calculator);
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, calculator: Box<dyn Calculator>) -> Self {
        self.register(calculator);
        self
    }

    /// Registered calculators.
    pub fn calculator_count(&self) -> usize {
        self.calculators.len()
    }

    /// Run every calculator for the department and session.
    pub async fn run(
        &self,
        department_id: DepartmentId,
        session_id: SessionId,
    ) -> KpiResult<PillarRun> {
        let pillar_start = Instant::now();
        let mut pillar = Pillar::new(&self.pillar_name);
        let mut omitted = Vec::new();

        for calculator in &self.calculators {
            let start = Instant::now();

            match calculator.calculate(department_id, session_id).await {
                Ok(metrics) => {
                    tracing::debug!(
                        pillar = %self.pillar_name,
                        calculator = calculator.name(),
                        metric_count = metrics.len(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Calculator complete"
                    );
                    pillar.metrics.extend(metrics.into_values());
                }
                Err(err) if err.is_recoverable() => {
                    tracing::warn!(
                        pillar = %self.pillar_name,
                        calculator = calculator.name(),
                        department_id,
                        session_id,
                        reason = %err,
                        "Insufficient data; omitting calculator metrics"
                    );
                    omitted.push(OmittedMetric {
                        calculator: calculator.name().to_string(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => {
                    tracing::error!(
                        pillar = %self.pillar_name,
                        calculator = calculator.name(),
                        department_id,
                        session_id,
                        error = %err,
                        "Calculator failed; aborting pillar"
                    );
                    return Err(err);
                }
            }
        }

        tracing::info!(
            pillar = %self.pillar_name,
            department_id,
            session_id,
            metric_count = pillar.metrics.len(),
            omitted = omitted.len(),
            duration_ms = pillar_start.elapsed().as_millis() as u64,
            "Pillar complete"
        );

        Ok(PillarRun { pillar, omitted })
    }
}
