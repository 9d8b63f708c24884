//! Analysis orchestration
//!
//! Validates the dataset, runs the requested engines in sequence and
//! assembles their outputs into one result. An engine error aborts the run
//! and names the engine it came from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::AnalysisConfig;
use crate::engine::{
    analyze_visibility, ActionItem, Forecast, Forecaster, GovernanceChecker, GovernanceReport,
    OptimizationPlan, Optimizer, VisibilityReport, WasteDetector, WasteReport,
};
use crate::error::{Engine, Result};
use crate::models::CostDataset;
use crate::observability::{AnalysisMetrics, StructuredLogger};

/// Which engines to run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub visibility: bool,
    pub waste: bool,
    /// Implies waste detection
    pub optimization: bool,
    pub governance: bool,
    /// Forecast horizon in months; no forecast when absent
    pub forecast_months: Option<u32>,
}

impl AnalysisRequest {
    /// Visibility, waste, optimization and governance
    pub fn full() -> Self {
        Self {
            visibility: true,
            waste: true,
            optimization: true,
            governance: true,
            forecast_months: None,
        }
    }

    pub fn with_forecast(mut self, months: u32) -> Self {
        self.forecast_months = Some(months);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub account_id: String,
    pub region: String,
    pub collected_at: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
}

/// Combined output of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub metadata: AnalysisMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<VisibilityReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waste: Option<WasteReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimization: Option<OptimizationPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<Forecast>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub governance: Option<GovernanceReport>,
}

/// Headline numbers for the end of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottomLine {
    pub current_monthly_spend: f64,
    pub identified_waste: f64,
    pub optimization_potential: f64,
    pub total_monthly_savings: f64,
    pub total_annual_impact: f64,
    pub optimized_monthly_spend: f64,
    pub reduction_percent: f64,
}

impl AnalysisResult {
    /// Waste cleanup actions, largest savings first
    pub fn action_plan(&self) -> Vec<ActionItem> {
        self.waste
            .as_ref()
            .map(WasteReport::action_plan)
            .unwrap_or_default()
    }

    /// Combine current spend with waste and optimization savings
    pub fn bottom_line(&self, current_monthly_spend: f64) -> BottomLine {
        let identified_waste = self
            .waste
            .as_ref()
            .map(|w| w.total_monthly_savings)
            .unwrap_or(0.0);
        let optimization_potential = self
            .optimization
            .as_ref()
            .map(|o| o.total_potential_savings)
            .unwrap_or(0.0);
        let total_monthly_savings = identified_waste + optimization_potential;

        BottomLine {
            current_monthly_spend,
            identified_waste,
            optimization_potential,
            total_monthly_savings,
            total_annual_impact: total_monthly_savings * 12.0,
            optimized_monthly_spend: current_monthly_spend - total_monthly_savings,
            reduction_percent: if current_monthly_spend > 0.0 {
                total_monthly_savings / current_monthly_spend * 100.0
            } else {
                0.0
            },
        }
    }
}

/// Runs engines over a dataset
pub struct Analyzer {
    config: AnalysisConfig,
    metrics: AnalysisMetrics,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        Ok(Self {
            config,
            metrics: AnalysisMetrics::new()?,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn metrics(&self) -> &AnalysisMetrics {
        &self.metrics
    }

    /// Validate the dataset and run the requested engines
    pub fn run(&self, dataset: &CostDataset, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let logger = StructuredLogger::new(&dataset.account_id);
        let started = Instant::now();

        if let Err(err) = dataset.validate() {
            logger.log_validation_failed(&err.to_string());
            return Err(err.into());
        }
        logger.log_analysis_started(&dataset.region, dataset.resource_count());

        let mut engines_run = 0usize;

        let visibility = if request.visibility {
            let (report, elapsed) = timed(|| analyze_visibility(dataset));
            self.engine_completed(&logger, Engine::Visibility, elapsed, report.by_service.len());
            engines_run += 1;
            Some(report)
        } else {
            None
        };

        let waste = if request.waste || request.optimization {
            let detector = WasteDetector::new(&self.config);
            let (report, elapsed) = timed(|| detector.detect(dataset));
            self.engine_completed(&logger, Engine::Waste, elapsed, report.total_items);
            engines_run += 1;
            self.record_waste(&report);
            logger.log_waste_detected(report.total_items, report.total_monthly_savings);
            Some(report)
        } else {
            None
        };

        let optimization = match (&waste, request.optimization) {
            (Some(waste), true) => {
                let optimizer = Optimizer::new(&self.config);
                let (plan, elapsed) = timed(|| optimizer.optimize(dataset, waste));
                self.engine_completed(
                    &logger,
                    Engine::Optimization,
                    elapsed,
                    plan.recommendations().count(),
                );
                engines_run += 1;
                self.metrics
                    .set_monthly_savings("optimization", plan.total_potential_savings);
                Some(plan)
            }
            _ => None,
        };

        let forecast = match request.forecast_months {
            Some(months) => {
                let forecaster = Forecaster::new(&self.config.forecast);
                let (outcome, elapsed) =
                    timed(|| forecaster.forecast(dataset.total_monthly_cost, months));
                match outcome {
                    Ok(forecast) => {
                        self.engine_completed(&logger, Engine::Forecast, elapsed, forecast.scenarios.len());
                        engines_run += 1;
                        Some(forecast)
                    }
                    Err(err) => {
                        logger.log_engine_failed(Engine::Forecast, &err.to_string());
                        return Err(err.in_engine(Engine::Forecast));
                    }
                }
            }
            None => None,
        };

        let governance = if request.governance {
            let checker = GovernanceChecker::new(&self.config.governance);
            let (report, elapsed) = timed(|| checker.check(dataset));
            self.engine_completed(&logger, Engine::Governance, elapsed, report.untagged_resources);
            engines_run += 1;
            self.metrics
                .set_tag_compliance(&dataset.account_id, report.tag_compliance);
            Some(report)
        } else {
            None
        };

        self.metrics.inc_analyses();
        logger.log_analysis_finished(engines_run, started.elapsed().as_secs_f64());

        Ok(AnalysisResult {
            metadata: AnalysisMetadata {
                account_id: dataset.account_id.clone(),
                region: dataset.region.clone(),
                collected_at: dataset.collected_at,
                generated_at: Utc::now(),
            },
            visibility,
            waste,
            optimization,
            forecast,
            governance,
        })
    }

    fn engine_completed(&self, logger: &StructuredLogger, engine: Engine, elapsed: f64, items: usize) {
        self.metrics.observe_engine_latency(engine, elapsed);
        logger.log_engine_completed(engine, elapsed, items);
    }

    fn record_waste(&self, report: &WasteReport) {
        let c = &report.categories;
        self.metrics.set_waste_findings("idle_compute", c.idle_compute.len());
        self.metrics
            .set_waste_findings("orphaned_volumes", c.orphaned_volumes.len());
        self.metrics
            .set_waste_findings("aged_snapshots", c.aged_snapshots.len());
        self.metrics
            .set_waste_findings("unused_addresses", c.unused_addresses.len());
        self.metrics
            .set_waste_findings("idle_databases", c.idle_databases.len());
        self.metrics
            .set_monthly_savings("waste", report.total_monthly_savings);
    }
}

/// Run a closure and return its output with the elapsed seconds
fn timed<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed().as_secs_f64())
}
