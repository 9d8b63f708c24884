//! Core data models for the cost dataset

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tag set attached to a cloud resource (key → value)
pub type Tags = BTreeMap<String, String>;

/// Cost amounts keyed by a grouping label (service, team, environment)
pub type CostBreakdown = BTreeMap<String, f64>;

/// Lifecycle state reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceState {
    Pending,
    Running,
    Stopping,
    Stopped,
    ShuttingDown,
    Terminated,
    Available,
    InUse,
    Creating,
    Deleting,
    #[serde(other)]
    Unknown,
}

impl ResourceState {
    pub fn is_running(&self) -> bool {
        matches!(self, ResourceState::Running)
    }
}

/// Resource category a record or finding belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "EC2")]
    Instance,
    #[serde(rename = "EBS")]
    Volume,
    #[serde(rename = "Snapshot")]
    Snapshot,
    #[serde(rename = "EIP")]
    ElasticAddress,
    #[serde(rename = "RDS")]
    DatabaseInstance,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Instance => "EC2",
            ResourceKind::Volume => "EBS",
            ResourceKind::Snapshot => "Snapshot",
            ResourceKind::ElasticAddress => "EIP",
            ResourceKind::DatabaseInstance => "RDS",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Compute instance (EC2)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeInstance {
    pub id: String,
    #[serde(rename = "type")]
    pub instance_type: String,
    pub state: ResourceState,
    /// Average CPU utilization over the lookback window, absent when unmeasured
    #[serde(default)]
    pub cpu_avg: Option<f64>,
    #[serde(default)]
    pub tags: Tags,
}

/// Block storage volume (EBS)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockVolume {
    pub id: String,
    pub size_gb: u64,
    #[serde(rename = "type")]
    pub volume_type: String,
    pub state: ResourceState,
    #[serde(default)]
    pub attached: Option<bool>,
    #[serde(default)]
    pub tags: Tags,
}

impl BlockVolume {
    /// Missing attachment data counts as attached.
    pub fn is_attached(&self) -> bool {
        self.attached.unwrap_or(true)
    }
}

/// Volume snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    pub size_gb: u64,
    pub age_days: u32,
    #[serde(default)]
    pub tags: Tags,
}

/// Elastic (static public) IP address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticAddress {
    pub id: String,
    pub ip: String,
    #[serde(default)]
    pub attached: Option<bool>,
    #[serde(default)]
    pub tags: Tags,
}

impl ElasticAddress {
    /// Missing association data counts as attached.
    pub fn is_attached(&self) -> bool {
        self.attached.unwrap_or(true)
    }
}

/// Managed database instance (RDS)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseInstance {
    pub id: String,
    #[serde(rename = "type")]
    pub instance_class: String,
    pub engine: String,
    pub state: ResourceState,
    #[serde(default)]
    pub cpu_avg: Option<f64>,
    #[serde(default)]
    pub tags: Tags,
}

/// Snapshot of an account's inventory and billing data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostDataset {
    pub account_id: String,
    pub region: String,
    #[serde(rename = "collection_time")]
    pub collected_at: DateTime<Utc>,

    #[serde(default, rename = "ec2_instances")]
    pub instances: Vec<ComputeInstance>,
    #[serde(default, rename = "ebs_volumes")]
    pub volumes: Vec<BlockVolume>,
    #[serde(default)]
    pub snapshots: Vec<Snapshot>,
    #[serde(default, rename = "elastic_ips")]
    pub addresses: Vec<ElasticAddress>,
    #[serde(default, rename = "rds_instances")]
    pub databases: Vec<DatabaseInstance>,

    pub total_monthly_cost: f64,
    #[serde(default)]
    pub costs_by_service: CostBreakdown,
    #[serde(default)]
    pub costs_by_team: CostBreakdown,
    #[serde(default)]
    pub costs_by_environment: CostBreakdown,
}

impl CostDataset {
    /// Create an empty dataset for the given account and region
    pub fn new(account_id: impl Into<String>, region: impl Into<String>, collected_at: DateTime<Utc>) -> Self {
        Self {
            account_id: account_id.into(),
            region: region.into(),
            collected_at,
            instances: Vec::new(),
            volumes: Vec::new(),
            snapshots: Vec::new(),
            addresses: Vec::new(),
            databases: Vec::new(),
            total_monthly_cost: 0.0,
            costs_by_service: CostBreakdown::new(),
            costs_by_team: CostBreakdown::new(),
            costs_by_environment: CostBreakdown::new(),
        }
    }

    /// Instances currently in the running state
    pub fn running_instances(&self) -> impl Iterator<Item = &ComputeInstance> {
        self.instances.iter().filter(|i| i.state.is_running())
    }

    /// Total number of resource records across all categories
    pub fn resource_count(&self) -> usize {
        self.instances.len()
            + self.volumes.len()
            + self.snapshots.len()
            + self.addresses.len()
            + self.databases.len()
    }
}
