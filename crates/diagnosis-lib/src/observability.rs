//! Observability for the diagnosis engine
//!
//! Provides:
//! - Prometheus metrics (plans generated, validation failures, diagnosis latency)
//! - Structured logging of engine events with tracing

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram,
    IntCounter, IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::error::ValidationError;
use crate::models::DiagnosisPlan;

/// Histogram buckets for diagnosis latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<EngineMetricsInner> = OnceLock::new();

struct EngineMetricsInner {
    diagnosis_latency_seconds: Histogram,
    plans_generated: IntCounter,
    recommendations_emitted: IntCounter,
    validation_failures: IntCounterVec,
}

impl EngineMetricsInner {
    fn new() -> Self {
        Self {
            diagnosis_latency_seconds: register_histogram!(
                "costplan_diagnosis_latency_seconds",
                "Time spent producing one diagnosis plan",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register diagnosis_latency_seconds"),

            plans_generated: register_int_counter!(
                "costplan_plans_generated_total",
                "Total number of diagnosis plans generated"
            )
            .expect("Failed to register plans_generated"),

            recommendations_emitted: register_int_counter!(
                "costplan_recommendations_emitted_total",
                "Total number of recommendations across all plans"
            )
            .expect("Failed to register recommendations_emitted"),

            validation_failures: register_int_counter_vec!(
                "costplan_validation_failures_total",
                "Profiles rejected by validation, by field",
                &["field"]
            )
            .expect("Failed to register validation_failures"),
        }
    }
}

/// Engine metrics for Prometheus exposition
///
/// Lightweight handle to the process-wide registry; clones share the same
/// underlying metrics.
#[derive(Clone)]
pub struct EngineMetrics {
    _private: (),
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(EngineMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &EngineMetricsInner {
        GLOBAL_METRICS.get_or_init(EngineMetricsInner::new)
    }

    /// Record one completed plan
    pub fn record_plan(&self, plan: &DiagnosisPlan, duration_secs: f64) {
        let inner = self.inner();
        inner.diagnosis_latency_seconds.observe(duration_secs);
        inner.plans_generated.inc();
        inner
            .recommendations_emitted
            .inc_by(plan.recommendations.len() as u64);
    }

    pub fn inc_validation_failure(&self, field: &str) {
        self.inner()
            .validation_failures
            .with_label_values(&[field])
            .inc();
    }

    pub fn plans_generated(&self) -> u64 {
        self.inner().plans_generated.get()
    }

    /// Render every registered metric in the Prometheus text format
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Structured logger for engine events
#[derive(Clone)]
pub struct StructuredLogger {
    source: String,
}

impl StructuredLogger {
    /// `source` tags every event (e.g. the invoking command)
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn log_catalog_loaded(&self, version: &str, rules: usize, origin: &str) {
        info!(
            event = "catalog_loaded",
            source = %self.source,
            catalog_version = %version,
            rules = rules,
            origin = %origin,
            "Rule catalog loaded"
        );
    }

    pub fn log_diagnosis(&self, plan: &DiagnosisPlan, duration_secs: f64) {
        info!(
            event = "diagnosis_completed",
            source = %self.source,
            catalog_version = %plan.catalog_version,
            budget_tier = %plan.tiers.budget,
            company_size_tier = %plan.tiers.company_size,
            modifiers = plan.modifiers.len(),
            recommendations = plan.recommendations.len(),
            immediate = plan.phases.immediate.len(),
            signals = ?plan.summary.signals,
            duration_secs = duration_secs,
            "Diagnosis completed"
        );
    }

    pub fn log_validation_failure(&self, error: &ValidationError, index: Option<usize>) {
        warn!(
            event = "validation_failed",
            source = %self.source,
            field = %error.field(),
            profile_index = ?index,
            error = %error,
            "Profile rejected"
        );
    }

    pub fn log_batch_completed(&self, total: usize, failed: usize, duration_secs: f64) {
        info!(
            event = "batch_completed",
            source = %self.source,
            total = total,
            succeeded = total.saturating_sub(failed),
            failed = failed,
            duration_secs = duration_secs,
            "Batch diagnosis completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_handles_share_registry() {
        let a = EngineMetrics::new();
        let b = a.clone();
        let before = b.plans_generated();
        a.inner().plans_generated.inc();
        assert!(b.plans_generated() > before);
    }

    #[test]
    fn test_encode_text_lists_engine_metrics() {
        let metrics = EngineMetrics::new();
        metrics.inc_validation_failure("company-size");
        let text = metrics.encode_text().unwrap();
        assert!(text.contains("costplan_validation_failures_total"));
        assert!(text.contains("field=\"company-size\""));
    }
}
