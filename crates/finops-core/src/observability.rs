//! Observability for analysis runs
//!
//! Provides:
//! - Prometheus metrics (engine latency, findings, savings, compliance)
//! - Structured logging with tracing

use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounter, IntGaugeVec, Opts, Registry,
    TextEncoder,
};
use tracing::{debug, info, warn};

use crate::error::Engine;

/// Histogram buckets for engine latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0,
];

/// Metrics recorded by the analyzer
///
/// Each instance owns its registry, so several analyzers (or tests) can
/// coexist in one process.
#[derive(Clone)]
pub struct AnalysisMetrics {
    registry: Registry,
    engine_latency_seconds: HistogramVec,
    waste_findings: IntGaugeVec,
    monthly_savings: GaugeVec,
    tag_compliance_percent: GaugeVec,
    analyses_total: IntCounter,
}

impl AnalysisMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let engine_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "finops_engine_latency_seconds",
                "Time spent running each analysis engine",
            )
            .buckets(LATENCY_BUCKETS.to_vec()),
            &["engine"],
        )?;
        let waste_findings = IntGaugeVec::new(
            Opts::new("finops_waste_findings", "Waste findings in the last run by category"),
            &["category"],
        )?;
        let monthly_savings = GaugeVec::new(
            Opts::new(
                "finops_monthly_savings_usd",
                "Estimated monthly savings in the last run by source",
            ),
            &["source"],
        )?;
        let tag_compliance_percent = GaugeVec::new(
            Opts::new("finops_tag_compliance_percent", "Tag compliance of the last run"),
            &["account"],
        )?;
        let analyses_total = IntCounter::new(
            "finops_analyses_total",
            "Total number of completed analysis runs",
        )?;

        registry.register(Box::new(engine_latency_seconds.clone()))?;
        registry.register(Box::new(waste_findings.clone()))?;
        registry.register(Box::new(monthly_savings.clone()))?;
        registry.register(Box::new(tag_compliance_percent.clone()))?;
        registry.register(Box::new(analyses_total.clone()))?;

        Ok(Self {
            registry,
            engine_latency_seconds,
            waste_findings,
            monthly_savings,
            tag_compliance_percent,
            analyses_total,
        })
    }

    /// Record how long an engine took
    pub fn observe_engine_latency(&self, engine: Engine, duration_secs: f64) {
        self.engine_latency_seconds
            .with_label_values(&[engine.as_str()])
            .observe(duration_secs);
    }

    /// Update the findings gauge for a waste category
    pub fn set_waste_findings(&self, category: &str, count: usize) {
        self.waste_findings
            .with_label_values(&[category])
            .set(count as i64);
    }

    /// Update the savings gauge ("waste" or "optimization")
    pub fn set_monthly_savings(&self, source: &str, amount: f64) {
        self.monthly_savings.with_label_values(&[source]).set(amount);
    }

    pub fn set_tag_compliance(&self, account: &str, percent: f64) {
        self.tag_compliance_percent
            .with_label_values(&[account])
            .set(percent);
    }

    pub fn inc_analyses(&self) {
        self.analyses_total.inc();
    }

    pub fn analyses_total(&self) -> u64 {
        self.analyses_total.get()
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn encode_text(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Structured logger for analysis events
///
/// Emits one event per step with consistent fields so runs can be
/// correlated by account.
#[derive(Clone)]
pub struct StructuredLogger {
    account_id: String,
}

impl StructuredLogger {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
        }
    }

    /// Log the start of a run
    pub fn log_analysis_started(&self, region: &str, resources: usize) {
        info!(
            event = "analysis_started",
            account = %self.account_id,
            region = %region,
            resources = resources,
            "Starting cost analysis"
        );
    }

    /// Log a dataset that failed validation
    pub fn log_validation_failed(&self, reason: &str) {
        warn!(
            event = "validation_failed",
            account = %self.account_id,
            reason = %reason,
            "Dataset rejected before analysis"
        );
    }

    /// Log a finished engine
    pub fn log_engine_completed(&self, engine: Engine, duration_secs: f64, items: usize) {
        debug!(
            event = "engine_completed",
            account = %self.account_id,
            engine = %engine,
            duration_secs = duration_secs,
            items = items,
            "Engine completed"
        );
    }

    /// Log an engine that aborted the run
    pub fn log_engine_failed(&self, engine: Engine, error: &str) {
        warn!(
            event = "engine_failed",
            account = %self.account_id,
            engine = %engine,
            error = %error,
            "Engine failed, aborting analysis"
        );
    }

    /// Log the waste summary
    pub fn log_waste_detected(&self, items: usize, monthly_savings: f64) {
        info!(
            event = "waste_detected",
            account = %self.account_id,
            items = items,
            monthly_savings = monthly_savings,
            "Waste detection finished"
        );
    }

    /// Log the end of a run
    pub fn log_analysis_finished(&self, engines: usize, duration_secs: f64) {
        info!(
            event = "analysis_finished",
            account = %self.account_id,
            engines = engines,
            duration_secs = duration_secs,
            "Cost analysis finished"
        );
    }
}
