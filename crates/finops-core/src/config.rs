//! Analysis configuration
//!
//! Every threshold and rate the engines use lives here so callers can
//! override them per run. All fields deserialize with defaults, so a partial
//! config file only needs to name what it changes.

use serde::{Deserialize, Serialize};

use crate::pricing::PricingTable;

/// CPU percentage below which a measured resource counts as idle
pub const IDLE_CPU_THRESHOLD: f64 = 5.0;

/// Days of CPU history the collection layer averages over
pub const IDLE_LOOKBACK_DAYS: u32 = 7;

/// Snapshots older than this many days are flagged
pub const SNAPSHOT_AGE_DAYS: u32 = 90;

/// Top-level configuration for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub idle_cpu_threshold: f64,
    /// Consumed by the collection layer only; carried for completeness
    pub idle_lookback_days: u32,
    pub snapshot_age_days: u32,
    pub pricing: PricingTable,
    pub governance: GovernanceConfig,
    pub forecast: ForecastConfig,
    pub optimization: OptimizationConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            idle_cpu_threshold: IDLE_CPU_THRESHOLD,
            idle_lookback_days: IDLE_LOOKBACK_DAYS,
            snapshot_age_days: SNAPSHOT_AGE_DAYS,
            pricing: PricingTable::default(),
            governance: GovernanceConfig::default(),
            forecast: ForecastConfig::default(),
            optimization: OptimizationConfig::default(),
        }
    }
}

/// Tag governance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    /// Tag keys every scanned resource must carry
    pub required_tags: Vec<String>,
    /// Maximum number of violations listed in the report
    pub max_violations: usize,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            required_tags: vec![
                "Environment".to_string(),
                "Team".to_string(),
                "CostCenter".to_string(),
            ],
            max_violations: 10,
        }
    }
}

/// Forecast scenario settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Compounding monthly growth rate as a fraction (0.05 = 5%)
    pub growth_rate: f64,
    /// Upfront reduction for the baseline, conservative and aggressive
    /// scenarios, as fractions of current spend
    pub optimization_levels: [f64; 3],
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            growth_rate: 0.05,
            optimization_levels: [0.0, 0.20, 0.40],
        }
    }
}

/// Optimization recommendation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationConfig {
    /// Volume type considered for migration
    pub legacy_volume_type: String,
    /// Volume type to migrate to
    pub upgraded_volume_type: String,
    /// Minimum running instances before reserved capacity is suggested
    pub reserved_min_instances: usize,
    /// Expected discount of reserved over on-demand pricing
    pub reserved_discount: f64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            legacy_volume_type: "gp2".to_string(),
            upgraded_volume_type: "gp3".to_string(),
            reserved_min_instances: 3,
            reserved_discount: 0.30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.idle_cpu_threshold, 5.0);
        assert_eq!(config.idle_lookback_days, 7);
        assert_eq!(config.snapshot_age_days, 90);
        assert_eq!(config.governance.required_tags.len(), 3);
        assert_eq!(config.governance.max_violations, 10);
        assert_eq!(config.forecast.optimization_levels, [0.0, 0.20, 0.40]);
        assert_eq!(config.optimization.reserved_min_instances, 3);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"idle_cpu_threshold": 10.0, "forecast": {"growth_rate": 0.02}}"#)
                .unwrap();
        assert_eq!(config.idle_cpu_threshold, 10.0);
        assert_eq!(config.forecast.growth_rate, 0.02);
        assert_eq!(config.forecast.optimization_levels, [0.0, 0.20, 0.40]);
        assert_eq!(config.snapshot_age_days, 90);
        assert_eq!(config.pricing, PricingTable::default());
    }
}
