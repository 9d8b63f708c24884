//! Cost forecasting
//!
//! Projects current monthly spend forward under three fixed scenarios that
//! differ only in the upfront optimization discount. Growth compounds
//! monthly, and each month's value is rounded to cents before the next
//! month is computed, so rounding error compounds along with growth.

use serde::{Deserialize, Serialize};

use crate::config::ForecastConfig;
use crate::error::{AnalysisError, Result};

const SCENARIO_NAMES: [&str; 3] = ["Baseline", "Conservative", "Aggressive"];

/// Round to two decimal places (cents)
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProjection {
    pub month: u32,
    pub cost: f64,
}

/// One projection path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastScenario {
    pub name: String,
    /// Upfront reduction as a fraction of current spend
    pub optimization_level: f64,
    /// Monthly growth as a fraction
    pub growth_rate: f64,
    pub projections: Vec<MonthlyProjection>,
    pub month_3: f64,
    pub month_6: f64,
    pub month_12: f64,
    /// Sum of the first twelve projected months (or fewer when the horizon is shorter)
    pub year_total: f64,
}

impl ForecastScenario {
    /// Projected cost at a 1-based month, zero beyond the horizon
    pub fn checkpoint(projections: &[MonthlyProjection], month: usize) -> f64 {
        month
            .checked_sub(1)
            .and_then(|idx| projections.get(idx))
            .map(|p| p.cost)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub months: u32,
    pub current_monthly: f64,
    pub scenarios: Vec<ForecastScenario>,
}

/// Deterministic multi-scenario projection
pub struct Forecaster<'a> {
    config: &'a ForecastConfig,
}

impl<'a> Forecaster<'a> {
    pub fn new(config: &'a ForecastConfig) -> Self {
        Self { config }
    }

    /// Project `current_monthly` forward `months` periods under every scenario
    pub fn forecast(&self, current_monthly: f64, months: u32) -> Result<Forecast> {
        if months == 0 {
            return Err(AnalysisError::InvalidHorizon);
        }

        let scenarios = SCENARIO_NAMES
            .iter()
            .zip(self.config.optimization_levels.iter())
            .map(|(label, level)| self.scenario(label, *level, current_monthly, months))
            .collect();

        Ok(Forecast {
            months,
            current_monthly,
            scenarios,
        })
    }

    fn scenario(&self, label: &str, level: f64, current_monthly: f64, months: u32) -> ForecastScenario {
        let growth = 1.0 + self.config.growth_rate;
        let mut cost = current_monthly * (1.0 - level);

        let projections: Vec<MonthlyProjection> = (1..=months)
            .map(|month| {
                cost = round_cents(cost * growth);
                MonthlyProjection { month, cost }
            })
            .collect();

        let year_total = projections
            .iter()
            .take(12)
            .fold(0.0, |acc, p| acc + p.cost);

        ForecastScenario {
            name: scenario_name(label, level),
            optimization_level: level,
            growth_rate: self.config.growth_rate,
            month_3: ForecastScenario::checkpoint(&projections, 3),
            month_6: ForecastScenario::checkpoint(&projections, 6),
            month_12: ForecastScenario::checkpoint(&projections, 12),
            year_total,
            projections,
        }
    }
}

fn scenario_name(label: &str, level: f64) -> String {
    if level <= 0.0 {
        format!("{} (No Optimization)", label)
    } else {
        format!("{} ({:.0}% Optimization)", label, level * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forecast(current: f64, months: u32) -> Forecast {
        let config = ForecastConfig::default();
        Forecaster::new(&config).forecast(current, months).unwrap()
    }

    #[test]
    fn test_three_named_scenarios() {
        let result = forecast(1000.0, 12);
        let names: Vec<&str> = result.scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Baseline (No Optimization)",
                "Conservative (20% Optimization)",
                "Aggressive (40% Optimization)",
            ]
        );
        assert!(result.scenarios.iter().all(|s| s.projections.len() == 12));
    }

    #[test]
    fn test_conservative_rounds_each_month() {
        let result = forecast(1000.0, 2);
        let conservative = &result.scenarios[1];
        assert_eq!(conservative.projections[0].cost, 840.00);
        assert_eq!(conservative.projections[1].cost, 882.00);
    }

    #[test]
    fn test_rounding_compounds() {
        // 0.01 * 1.05 rounds back to 0.01 every month
        let result = forecast(0.01, 6);
        assert!(result.scenarios[0]
            .projections
            .iter()
            .all(|p| p.cost == 0.01));
    }

    #[test]
    fn test_baseline_strictly_increasing() {
        let result = forecast(45234.50, 24);
        let baseline = &result.scenarios[0];
        for pair in baseline.projections.windows(2) {
            assert!(pair[1].cost > pair[0].cost);
        }
    }

    #[test]
    fn test_scenario_ordering_at_month_12() {
        let result = forecast(45234.50, 12);
        let [baseline, conservative, aggressive] = [
            &result.scenarios[0],
            &result.scenarios[1],
            &result.scenarios[2],
        ];
        assert!(aggressive.month_12 < conservative.month_12);
        assert!(conservative.month_12 < baseline.month_12);
    }

    #[test]
    fn test_short_horizon_checkpoints_are_zero() {
        let result = forecast(1000.0, 4);
        let baseline = &result.scenarios[0];
        assert_eq!(baseline.month_3, baseline.projections[2].cost);
        assert_eq!(baseline.month_6, 0.0);
        assert_eq!(baseline.month_12, 0.0);

        let sum: f64 = baseline.projections.iter().map(|p| p.cost).sum();
        assert!((baseline.year_total - sum).abs() < 1e-9);
    }

    #[test]
    fn test_year_total_caps_at_twelve_months() {
        let result = forecast(1000.0, 18);
        let baseline = &result.scenarios[0];
        let first_year: f64 = baseline.projections[..12].iter().map(|p| p.cost).sum();
        assert!((baseline.year_total - first_year).abs() < 1e-9);
        assert_eq!(baseline.month_12, baseline.projections[11].cost);
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let config = ForecastConfig::default();
        let result = Forecaster::new(&config).forecast(1000.0, 0);
        assert!(matches!(result, Err(AnalysisError::InvalidHorizon)));
    }

    #[test]
    fn test_zero_spend_stays_zero() {
        let result = forecast(0.0, 3);
        assert!(result
            .scenarios
            .iter()
            .flat_map(|s| s.projections.iter())
            .all(|p| p.cost == 0.0));
    }
}
