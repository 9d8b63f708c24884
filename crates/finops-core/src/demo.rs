//! Synthetic demo dataset
//!
//! A small account with a known mix of idle, orphaned and well-used
//! resources. Used by `--demo` and throughout the tests.

use chrono::Utc;

use crate::models::{
    BlockVolume, ComputeInstance, CostBreakdown, CostDataset, DatabaseInstance, ElasticAddress,
    ResourceState, Snapshot, Tags,
};

/// Account identifier reported by the demo dataset
pub const DEMO_ACCOUNT_ID: &str = "DEMO-123456789";

fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn breakdown(pairs: &[(&str, f64)]) -> CostBreakdown {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn instance(
    id: &str,
    instance_type: &str,
    state: ResourceState,
    cpu_avg: f64,
    tag_pairs: &[(&str, &str)],
) -> ComputeInstance {
    ComputeInstance {
        id: id.to_string(),
        instance_type: instance_type.to_string(),
        state,
        cpu_avg: Some(cpu_avg),
        tags: tags(tag_pairs),
    }
}

fn volume(
    id: &str,
    size_gb: u64,
    volume_type: &str,
    attached: bool,
    tag_pairs: &[(&str, &str)],
) -> BlockVolume {
    BlockVolume {
        id: id.to_string(),
        size_gb,
        volume_type: volume_type.to_string(),
        state: if attached {
            ResourceState::InUse
        } else {
            ResourceState::Available
        },
        attached: Some(attached),
        tags: tags(tag_pairs),
    }
}

fn snapshot(id: &str, size_gb: u64, age_days: u32, tag_pairs: &[(&str, &str)]) -> Snapshot {
    Snapshot {
        id: id.to_string(),
        size_gb,
        age_days,
        tags: tags(tag_pairs),
    }
}

/// Build the demo dataset for a region
pub fn demo_dataset(region: &str) -> CostDataset {
    use ResourceState::{Running, Stopped};

    let mut dataset = CostDataset::new(DEMO_ACCOUNT_ID, region, Utc::now());

    dataset.instances = vec![
        instance("i-demo001", "t3.medium", Running, 2.3, &[("Environment", "dev"), ("Team", "engineering")]),
        instance("i-demo002", "m5.large", Running, 1.1, &[("Environment", "staging"), ("Team", "data-science")]),
        instance("i-demo003", "t3.large", Running, 3.5, &[("Environment", "dev"), ("Team", "engineering")]),
        instance("i-demo004", "t3.xlarge", Stopped, 0.0, &[("Environment", "dev")]),
        instance("i-prod001", "m5.2xlarge", Running, 65.3, &[("Environment", "production"), ("Team", "backend")]),
        instance("i-prod002", "c5.xlarge", Running, 78.2, &[("Environment", "production"), ("Team", "backend")]),
    ];

    dataset.volumes = vec![
        volume("vol-demo001", 100, "gp2", false, &[]),
        volume("vol-demo002", 50, "gp2", false, &[]),
        volume("vol-demo003", 200, "gp3", true, &[("Environment", "production")]),
        volume("vol-demo004", 500, "gp2", true, &[("Environment", "production")]),
    ];

    dataset.snapshots = vec![
        snapshot("snap-demo001", 80, 120, &[]),
        snapshot("snap-demo002", 100, 150, &[]),
        snapshot("snap-demo003", 50, 200, &[]),
        snapshot("snap-demo004", 30, 45, &[("Backup", "weekly")]),
    ];

    dataset.addresses = vec![
        ElasticAddress {
            id: "eip-demo001".to_string(),
            ip: "54.123.45.67".to_string(),
            attached: Some(false),
            tags: Tags::new(),
        },
        ElasticAddress {
            id: "eip-demo002".to_string(),
            ip: "52.98.76.54".to_string(),
            attached: Some(true),
            tags: tags(&[("Environment", "production")]),
        },
    ];

    dataset.databases = vec![
        DatabaseInstance {
            id: "db-demo001".to_string(),
            instance_class: "db.t3.medium".to_string(),
            engine: "postgres".to_string(),
            state: ResourceState::Available,
            cpu_avg: Some(2.1),
            tags: tags(&[("Environment", "dev")]),
        },
        DatabaseInstance {
            id: "db-prod001".to_string(),
            instance_class: "db.r5.large".to_string(),
            engine: "mysql".to_string(),
            state: ResourceState::Available,
            cpu_avg: Some(45.3),
            tags: tags(&[("Environment", "production")]),
        },
    ];

    dataset.total_monthly_cost = 45234.50;
    dataset.costs_by_service = breakdown(&[
        ("EC2", 18450.00),
        ("RDS", 12300.00),
        ("S3", 5670.00),
        ("Data Transfer", 4890.00),
        ("EBS", 2100.00),
        ("Other", 1824.50),
    ]);
    dataset.costs_by_team = breakdown(&[
        ("engineering", 22100.00),
        ("data-science", 15670.00),
        ("backend", 7464.50),
    ]);
    dataset.costs_by_environment = breakdown(&[
        ("production", 31650.00),
        ("staging", 9050.00),
        ("development", 4534.50),
    ]);

    dataset
}
