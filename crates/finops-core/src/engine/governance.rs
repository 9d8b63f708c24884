//! Tag governance
//!
//! Scans compute instances and block volumes for the required tag keys.
//! Tag values are not inspected.

use serde::{Deserialize, Serialize};

use crate::config::GovernanceConfig;
use crate::models::{CostDataset, ResourceKind, Tags};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceViolation {
    pub resource_type: ResourceKind,
    pub resource_id: String,
    /// Missing keys, in required-tag order
    pub missing_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceReport {
    /// Percentage of scanned resources carrying every required tag, one decimal
    pub tag_compliance: f64,
    pub compliant_resources: usize,
    /// All non-compliant resources, including those not listed below
    pub untagged_resources: usize,
    /// First violations in scan order, capped by configuration
    pub violations: Vec<ComplianceViolation>,
}

/// Checks tag compliance of scanned resources
pub struct GovernanceChecker<'a> {
    config: &'a GovernanceConfig,
}

impl<'a> GovernanceChecker<'a> {
    pub fn new(config: &'a GovernanceConfig) -> Self {
        Self { config }
    }

    /// Required keys absent from a tag set
    pub fn missing_tags(&self, tags: &Tags) -> Vec<String> {
        self.config
            .required_tags
            .iter()
            .filter(|key| !tags.contains_key(key.as_str()))
            .cloned()
            .collect()
    }

    /// Scan instances, then volumes
    pub fn check(&self, dataset: &CostDataset) -> GovernanceReport {
        let scanned = dataset
            .instances
            .iter()
            .map(|i| (ResourceKind::Instance, i.id.as_str(), &i.tags))
            .chain(
                dataset
                    .volumes
                    .iter()
                    .map(|v| (ResourceKind::Volume, v.id.as_str(), &v.tags)),
            );

        let mut total = 0usize;
        let mut compliant = 0usize;
        let mut violations = Vec::new();

        for (kind, id, tags) in scanned {
            total += 1;
            let missing_tags = self.missing_tags(tags);
            if missing_tags.is_empty() {
                compliant += 1;
            } else {
                violations.push(ComplianceViolation {
                    resource_type: kind,
                    resource_id: id.to_string(),
                    missing_tags,
                });
            }
        }

        let untagged_resources = violations.len();
        violations.truncate(self.config.max_violations);

        GovernanceReport {
            tag_compliance: compliance_percentage(compliant, total),
            compliant_resources: compliant,
            untagged_resources,
            violations,
        }
    }
}

/// Compliance rounded to one decimal; nothing scanned is fully compliant
fn compliance_percentage(compliant: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let pct = compliant as f64 / total as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}
