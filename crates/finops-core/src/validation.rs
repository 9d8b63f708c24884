//! Dataset validation
//!
//! Runs once before any engine; the engines assume a dataset that passed.
//! Missing fields are rejected earlier by deserialization, so this covers
//! value-level checks only.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::models::{CostBreakdown, CostDataset, ResourceKind};

impl CostDataset {
    /// Check amounts, identifiers and utilization ranges
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_amount("total_monthly_cost", self.total_monthly_cost)?;
        check_breakdown("costs_by_service", &self.costs_by_service)?;
        check_breakdown("costs_by_team", &self.costs_by_team)?;
        check_breakdown("costs_by_environment", &self.costs_by_environment)?;

        check_ids(ResourceKind::Instance, self.instances.iter().map(|i| i.id.as_str()))?;
        check_ids(ResourceKind::Volume, self.volumes.iter().map(|v| v.id.as_str()))?;
        check_ids(ResourceKind::Snapshot, self.snapshots.iter().map(|s| s.id.as_str()))?;
        check_ids(
            ResourceKind::ElasticAddress,
            self.addresses.iter().map(|a| a.id.as_str()),
        )?;
        check_ids(
            ResourceKind::DatabaseInstance,
            self.databases.iter().map(|d| d.id.as_str()),
        )?;

        for instance in &self.instances {
            check_utilization(ResourceKind::Instance, &instance.id, instance.cpu_avg)?;
        }
        for db in &self.databases {
            check_utilization(ResourceKind::DatabaseInstance, &db.id, db.cpu_avg)?;
        }

        Ok(())
    }
}

fn check_amount(field: &str, value: f64) -> Result<(), ValidationError> {
    // NaN fails this comparison too
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NegativeCost {
            field: field.to_string(),
            value,
        })
    }
}

fn check_breakdown(name: &str, breakdown: &CostBreakdown) -> Result<(), ValidationError> {
    for (label, amount) in breakdown {
        check_amount(&format!("{}.{}", name, label), *amount)?;
    }
    Ok(())
}

fn check_ids<'a>(
    kind: ResourceKind,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyId { kind });
        }
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn check_utilization(
    kind: ResourceKind,
    id: &str,
    cpu_avg: Option<f64>,
) -> Result<(), ValidationError> {
    match cpu_avg {
        Some(value) if !(0.0..=100.0).contains(&value) => {
            Err(ValidationError::UtilizationOutOfRange {
                kind,
                id: id.to_string(),
                value,
            })
        }
        _ => Ok(()),
    }
}
