//! Analysis engines
//!
//! Each engine is a pure function of the dataset and its configuration:
//! - Waste detection (idle and orphaned resources)
//! - Optimization recommendations (consumes waste output)
//! - Forecasting (three fixed growth scenarios)
//! - Governance (required-tag compliance)
//! - Cost visibility (per-breakdown shares)

mod forecast;
mod governance;
mod optimization;
mod visibility;
mod waste;

pub use forecast::{round_cents, Forecast, ForecastScenario, Forecaster, MonthlyProjection};
pub use governance::{ComplianceViolation, GovernanceChecker, GovernanceReport};
pub use optimization::{Level, OptimizationPlan, OptimizationRecommendation, Optimizer};
pub use visibility::{analyze_visibility, breakdown_shares, CostBreakdownEntry, VisibilityReport};
pub use waste::{
    category_savings, ActionItem, Priority, WasteCategories, WasteDetector, WasteFinding,
    WasteReport, WasteTrigger,
};
