//! Optimization recommendations
//!
//! Turns waste findings and the raw inventory into three tiers of
//! recommendations: quick wins (0-30 days), medium term (30-90 days) and
//! long term (90+ days).

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::engine::waste::{category_savings, WasteReport};
use crate::models::CostDataset;

/// Qualitative effort or impact level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Level::Low => "Low",
            Level::Medium => "Medium",
            Level::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRecommendation {
    pub title: String,
    pub monthly_savings: f64,
    pub effort: Level,
    pub impact: Level,
    pub timeframe: String,
}

impl OptimizationRecommendation {
    fn new(
        title: impl Into<String>,
        monthly_savings: f64,
        effort: Level,
        impact: Level,
        timeframe: &str,
    ) -> Self {
        Self {
            title: title.into(),
            monthly_savings,
            effort,
            impact,
            timeframe: timeframe.to_string(),
        }
    }
}

/// Recommendations grouped by tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationPlan {
    pub quick_wins: Vec<OptimizationRecommendation>,
    pub medium_term: Vec<OptimizationRecommendation>,
    pub long_term: Vec<OptimizationRecommendation>,
    pub total_potential_savings: f64,
    pub total_annual_impact: f64,
}

impl OptimizationPlan {
    /// All recommendations, quick wins first
    pub fn recommendations(&self) -> impl Iterator<Item = &OptimizationRecommendation> {
        self.quick_wins
            .iter()
            .chain(self.medium_term.iter())
            .chain(self.long_term.iter())
    }
}

fn tier_savings(tier: &[OptimizationRecommendation]) -> f64 {
    tier.iter().fold(0.0, |acc, r| acc + r.monthly_savings)
}

/// Produces tiered recommendations from waste findings and inventory
pub struct Optimizer<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> Optimizer<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Build the full recommendation plan
    pub fn optimize(&self, dataset: &CostDataset, waste: &WasteReport) -> OptimizationPlan {
        let quick_wins = self.quick_wins(waste);
        let medium_term = self.medium_term(dataset);
        let long_term = self.long_term(dataset);

        let total_potential_savings =
            tier_savings(&quick_wins) + tier_savings(&medium_term) + tier_savings(&long_term);

        OptimizationPlan {
            quick_wins,
            medium_term,
            long_term,
            total_potential_savings,
            total_annual_impact: total_potential_savings * 12.0,
        }
    }

    /// Cleanup of idle compute, orphaned volumes and unused addresses
    pub fn quick_wins(&self, waste: &WasteReport) -> Vec<OptimizationRecommendation> {
        let categories = &waste.categories;
        let candidates = [
            OptimizationRecommendation::new(
                "Terminate idle EC2 instances",
                category_savings(&categories.idle_compute),
                Level::Low,
                Level::High,
                "0-7 days",
            ),
            OptimizationRecommendation::new(
                "Delete unattached EBS volumes",
                category_savings(&categories.orphaned_volumes),
                Level::Low,
                Level::Medium,
                "0-7 days",
            ),
            OptimizationRecommendation::new(
                "Release unused Elastic IPs",
                category_savings(&categories.unused_addresses),
                Level::Low,
                Level::Low,
                "0-1 days",
            ),
        ];

        let mut wins: Vec<_> = candidates
            .into_iter()
            .filter(|r| r.monthly_savings > 0.0)
            .collect();
        // Stable: equal savings keep category order
        wins.sort_by(|a, b| {
            b.monthly_savings
                .partial_cmp(&a.monthly_savings)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        wins
    }

    /// Storage-class migration of attached legacy volumes
    pub fn medium_term(&self, dataset: &CostDataset) -> Vec<OptimizationRecommendation> {
        let opts = &self.config.optimization;
        let pricing = &self.config.pricing;
        let rate_delta = pricing.storage_rate_per_gb(&opts.legacy_volume_type)
            - pricing.storage_rate_per_gb(&opts.upgraded_volume_type);

        let legacy: Vec<_> = dataset
            .volumes
            .iter()
            .filter(|v| v.volume_type == opts.legacy_volume_type && v.is_attached())
            .collect();

        let mut candidates = Vec::new();
        if !legacy.is_empty() {
            let savings = legacy
                .iter()
                .fold(0.0, |acc, v| acc + v.size_gb as f64 * rate_delta);
            candidates.push(OptimizationRecommendation::new(
                format!(
                    "Convert {} EBS volumes from {} to {}",
                    legacy.len(),
                    opts.legacy_volume_type,
                    opts.upgraded_volume_type
                ),
                savings,
                Level::Medium,
                Level::Medium,
                "30-60 days",
            ));
        }

        // Right-sizing needs memory and per-hour CPU data the dataset lacks,
        // so its estimate is zero and the filter below drops it.
        candidates.push(OptimizationRecommendation::new(
            "Right-size EC2 instances (requires detailed analysis)",
            0.0,
            Level::Medium,
            Level::High,
            "30-90 days",
        ));

        candidates
            .into_iter()
            .filter(|r| r.monthly_savings > 0.0)
            .collect()
    }

    /// Reserved capacity for a large enough running fleet
    pub fn long_term(&self, dataset: &CostDataset) -> Vec<OptimizationRecommendation> {
        let opts = &self.config.optimization;
        let running: Vec<_> = dataset.running_instances().collect();

        if running.len() < opts.reserved_min_instances {
            return Vec::new();
        }

        let on_demand = running.iter().fold(0.0, |acc, i| {
            acc + self.config.pricing.compute_monthly(&i.instance_type)
        });

        vec![OptimizationRecommendation::new(
            format!("Purchase Reserved Instances for {} instances", running.len()),
            on_demand * opts.reserved_discount,
            Level::High,
            Level::High,
            "90+ days",
        )]
    }
}
