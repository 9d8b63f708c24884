//! Cost visibility
//!
//! Breaks spend down by service, team and environment. Each breakdown is
//! normalised against its own sum, not the dataset total, since the
//! groupings come from independent sources.

use serde::{Deserialize, Serialize};

use crate::models::{CostBreakdown, CostDataset};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdownEntry {
    pub name: String,
    pub cost: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityReport {
    pub total_monthly_cost: f64,
    pub by_service: Vec<CostBreakdownEntry>,
    pub by_team: Vec<CostBreakdownEntry>,
    pub by_environment: Vec<CostBreakdownEntry>,
}

/// Largest cost first; ties fall back to name order
pub fn breakdown_shares(costs: &CostBreakdown) -> Vec<CostBreakdownEntry> {
    let total = costs.values().fold(0.0, |acc, c| acc + c);

    let mut entries: Vec<CostBreakdownEntry> = costs
        .iter()
        .map(|(name, cost)| CostBreakdownEntry {
            name: name.clone(),
            cost: *cost,
            percentage: if total > 0.0 { cost / total * 100.0 } else { 0.0 },
        })
        .collect();

    entries.sort_by(|a, b| {
        b.cost
            .partial_cmp(&a.cost)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries
}

pub fn analyze_visibility(dataset: &CostDataset) -> VisibilityReport {
    VisibilityReport {
        total_monthly_cost: dataset.total_monthly_cost,
        by_service: breakdown_shares(&dataset.costs_by_service),
        by_team: breakdown_shares(&dataset.costs_by_team),
        by_environment: breakdown_shares(&dataset.costs_by_environment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_dataset;

    fn costs(pairs: &[(&str, f64)]) -> CostBreakdown {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_two_entry_breakdown_is_self_normalising() {
        let shares = breakdown_shares(&costs(&[("EC2", 18450.00), ("RDS", 12300.00)]));
        assert_eq!(shares[0].name, "EC2");
        assert!((shares[0].percentage - 60.0).abs() < 1e-9);
        assert!((shares[1].percentage - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let report = analyze_visibility(&demo_dataset("us-east-1"));
        for breakdown in [&report.by_service, &report.by_team, &report.by_environment] {
            let sum: f64 = breakdown.iter().map(|e| e.percentage).sum();
            assert!((sum - 100.0).abs() < 0.1);
        }
        assert_eq!(report.total_monthly_cost, 45234.50);
    }

    #[test]
    fn test_sorted_descending() {
        let report = analyze_visibility(&demo_dataset("us-east-1"));
        let names: Vec<&str> = report.by_team.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["engineering", "data-science", "backend"]);
    }

    #[test]
    fn test_zero_total_yields_zero_share() {
        let shares = breakdown_shares(&costs(&[("a", 0.0), ("b", 0.0)]));
        assert!(shares.iter().all(|e| e.percentage == 0.0));
        assert!(breakdown_shares(&CostBreakdown::new()).is_empty());
    }

    #[test]
    fn test_ties_ordered_by_name() {
        let shares = breakdown_shares(&costs(&[("zeta", 5.0), ("alpha", 5.0)]));
        assert_eq!(shares[0].name, "alpha");
        assert_eq!(shares[1].name, "zeta");
    }
}
