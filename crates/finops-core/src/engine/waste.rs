//! Waste detection
//!
//! Flags idle and orphaned resources and prices each finding. One detector
//! per resource category; the detectors are independent of each other.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::models::{CostDataset, ResourceKind, Tags};

/// Urgency of acting on a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measurement that caused a resource to be flagged
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "metric", rename_all = "snake_case")]
pub enum WasteTrigger {
    LowUtilization { cpu_avg: f64 },
    Unattached,
    Age { days: u32 },
}

/// A single wasteful resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteFinding {
    pub resource_id: String,
    pub kind: ResourceKind,
    /// Instance type, volume type or database class; `snapshot` for
    /// snapshots and the public IP for addresses
    pub resource_type: String,
    pub trigger: WasteTrigger,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    pub monthly_cost: f64,
    pub recommendation: String,
    pub priority: Priority,
    pub tags: Tags,
}

/// Findings grouped by category, in fixed report order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WasteCategories {
    pub idle_compute: Vec<WasteFinding>,
    pub orphaned_volumes: Vec<WasteFinding>,
    pub aged_snapshots: Vec<WasteFinding>,
    pub unused_addresses: Vec<WasteFinding>,
    pub idle_databases: Vec<WasteFinding>,
}

impl WasteCategories {
    /// Category slices in report order
    pub fn iter(&self) -> impl Iterator<Item = &[WasteFinding]> {
        [
            self.idle_compute.as_slice(),
            self.orphaned_volumes.as_slice(),
            self.aged_snapshots.as_slice(),
            self.unused_addresses.as_slice(),
            self.idle_databases.as_slice(),
        ]
        .into_iter()
    }

    /// Every finding, category by category
    pub fn findings(&self) -> impl Iterator<Item = &WasteFinding> {
        self.iter().flatten()
    }
}

/// Sum of the monthly cost of a group of findings
pub fn category_savings(findings: &[WasteFinding]) -> f64 {
    findings.iter().fold(0.0, |acc, f| acc + f.monthly_cost)
}

/// Output of the waste detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteReport {
    pub categories: WasteCategories,
    pub total_monthly_savings: f64,
    pub total_annual_savings: f64,
    pub total_items: usize,
}

impl WasteReport {
    /// Build a report, deriving the totals from the findings
    pub fn from_categories(categories: WasteCategories) -> Self {
        let total_monthly_savings = categories
            .findings()
            .fold(0.0, |acc, f| acc + f.monthly_cost);
        let total_items = categories.findings().count();

        Self {
            categories,
            total_monthly_savings,
            total_annual_savings: total_monthly_savings * 12.0,
            total_items,
        }
    }

    /// Per-category cleanup actions, largest savings first
    pub fn action_plan(&self) -> Vec<ActionItem> {
        let c = &self.categories;
        let candidates = [
            (Priority::High, "Terminate idle EC2 instances", &c.idle_compute),
            (Priority::High, "Stop/right-size idle RDS databases", &c.idle_databases),
            (Priority::Medium, "Delete unattached EBS volumes", &c.orphaned_volumes),
            (Priority::Medium, "Release unused Elastic IPs", &c.unused_addresses),
            (Priority::Low, "Delete old snapshots", &c.aged_snapshots),
        ];

        let mut actions: Vec<ActionItem> = candidates
            .into_iter()
            .filter(|(_, _, findings)| !findings.is_empty())
            .map(|(priority, title, findings)| ActionItem {
                priority,
                title: title.to_string(),
                monthly_savings: category_savings(findings),
            })
            .collect();

        // Stable sort keeps the candidate order for equal savings
        actions.sort_by(|a, b| {
            b.monthly_savings
                .partial_cmp(&a.monthly_savings)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        actions
    }
}

/// One line of the prioritized action plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub priority: Priority,
    pub title: String,
    pub monthly_savings: f64,
}

/// Detects idle and orphaned resources
pub struct WasteDetector<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> WasteDetector<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Run every category detector over the dataset
    pub fn detect(&self, dataset: &CostDataset) -> WasteReport {
        WasteReport::from_categories(WasteCategories {
            idle_compute: self.idle_compute(dataset),
            orphaned_volumes: self.orphaned_volumes(dataset),
            aged_snapshots: self.aged_snapshots(dataset),
            unused_addresses: self.unused_addresses(dataset),
            idle_databases: self.idle_databases(dataset),
        })
    }

    /// Utilization counts as idle only when it was measured
    fn idle_utilization(&self, cpu_avg: Option<f64>) -> Option<f64> {
        cpu_avg.filter(|cpu| *cpu < self.config.idle_cpu_threshold)
    }

    /// Running instances with measured CPU below the idle threshold
    pub fn idle_compute(&self, dataset: &CostDataset) -> Vec<WasteFinding> {
        dataset
            .running_instances()
            .filter_map(|instance| {
                let cpu_avg = self.idle_utilization(instance.cpu_avg)?;
                Some(WasteFinding {
                    resource_id: instance.id.clone(),
                    kind: ResourceKind::Instance,
                    resource_type: instance.instance_type.clone(),
                    trigger: WasteTrigger::LowUtilization { cpu_avg },
                    size_gb: None,
                    engine: None,
                    monthly_cost: self.config.pricing.compute_monthly(&instance.instance_type),
                    recommendation: "Terminate or schedule shutdown".to_string(),
                    priority: Priority::High,
                    tags: instance.tags.clone(),
                })
            })
            .collect()
    }

    /// Volumes not attached to any instance, whatever their state
    pub fn orphaned_volumes(&self, dataset: &CostDataset) -> Vec<WasteFinding> {
        dataset
            .volumes
            .iter()
            .filter(|volume| !volume.is_attached())
            .map(|volume| WasteFinding {
                resource_id: volume.id.clone(),
                kind: ResourceKind::Volume,
                resource_type: volume.volume_type.clone(),
                trigger: WasteTrigger::Unattached,
                size_gb: Some(volume.size_gb),
                engine: None,
                monthly_cost: self
                    .config
                    .pricing
                    .volume_monthly(&volume.volume_type, volume.size_gb),
                recommendation: "Delete or create snapshot".to_string(),
                priority: Priority::Medium,
                tags: volume.tags.clone(),
            })
            .collect()
    }

    /// Snapshots strictly older than the age threshold
    pub fn aged_snapshots(&self, dataset: &CostDataset) -> Vec<WasteFinding> {
        dataset
            .snapshots
            .iter()
            .filter(|snapshot| snapshot.age_days > self.config.snapshot_age_days)
            .map(|snapshot| WasteFinding {
                resource_id: snapshot.id.clone(),
                kind: ResourceKind::Snapshot,
                resource_type: "snapshot".to_string(),
                trigger: WasteTrigger::Age {
                    days: snapshot.age_days,
                },
                size_gb: Some(snapshot.size_gb),
                engine: None,
                monthly_cost: self.config.pricing.snapshot_monthly(snapshot.size_gb),
                recommendation: format!("Delete snapshot ({} days old)", snapshot.age_days),
                priority: Priority::Low,
                tags: snapshot.tags.clone(),
            })
            .collect()
    }

    /// Addresses not associated with any resource
    pub fn unused_addresses(&self, dataset: &CostDataset) -> Vec<WasteFinding> {
        dataset
            .addresses
            .iter()
            .filter(|address| !address.is_attached())
            .map(|address| WasteFinding {
                resource_id: address.id.clone(),
                kind: ResourceKind::ElasticAddress,
                resource_type: address.ip.clone(),
                trigger: WasteTrigger::Unattached,
                size_gb: None,
                engine: None,
                monthly_cost: self.config.pricing.address_monthly,
                recommendation: "Release unused Elastic IP".to_string(),
                priority: Priority::Medium,
                tags: address.tags.clone(),
            })
            .collect()
    }

    /// Databases with measured CPU below the idle threshold; state is not checked
    pub fn idle_databases(&self, dataset: &CostDataset) -> Vec<WasteFinding> {
        dataset
            .databases
            .iter()
            .filter_map(|db| {
                let cpu_avg = self.idle_utilization(db.cpu_avg)?;
                Some(WasteFinding {
                    resource_id: db.id.clone(),
                    kind: ResourceKind::DatabaseInstance,
                    resource_type: db.instance_class.clone(),
                    trigger: WasteTrigger::LowUtilization { cpu_avg },
                    size_gb: None,
                    engine: Some(db.engine.clone()),
                    monthly_cost: self.config.pricing.database_monthly(&db.instance_class),
                    recommendation: "Stop or right-size database".to_string(),
                    priority: Priority::High,
                    tags: db.tags.clone(),
                })
            })
            .collect()
    }
}
