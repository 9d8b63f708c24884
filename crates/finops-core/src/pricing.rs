//! Approximate monthly on-demand pricing (USD)
//!
//! Lookups never fail: an unrecognized type resolves to the category's
//! fallback price.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fallback monthly price for an unknown instance type
pub const DEFAULT_COMPUTE_MONTHLY: f64 = 50.0;

/// Fallback per-GB monthly rate for an unknown volume type
pub const DEFAULT_STORAGE_PER_GB: f64 = 0.10;

/// Fallback monthly price for an unknown database class
pub const DEFAULT_DATABASE_MONTHLY: f64 = 100.0;

/// Per-GB monthly snapshot storage rate
pub const SNAPSHOT_PER_GB: f64 = 0.05;

/// Flat monthly charge for an unassociated elastic IP
pub const ADDRESS_MONTHLY: f64 = 3.65;

const COMPUTE_PRICES: &[(&str, f64)] = &[
    ("t2.micro", 8.47),
    ("t2.small", 16.79),
    ("t2.medium", 33.58),
    ("t2.large", 67.16),
    ("t2.xlarge", 134.32),
    ("t3.micro", 7.59),
    ("t3.small", 15.18),
    ("t3.medium", 30.37),
    ("t3.large", 60.74),
    ("t3.xlarge", 121.47),
    ("t3.2xlarge", 242.94),
    ("m5.large", 70.08),
    ("m5.xlarge", 140.16),
    ("m5.2xlarge", 280.32),
    ("m5.4xlarge", 560.64),
    ("m5.8xlarge", 1121.28),
    ("c5.large", 62.05),
    ("c5.xlarge", 124.10),
    ("c5.2xlarge", 248.19),
    ("r5.large", 91.98),
    ("r5.xlarge", 183.96),
    ("r5.2xlarge", 367.92),
];

const STORAGE_PRICES_PER_GB: &[(&str, f64)] = &[
    ("gp2", 0.10),
    ("gp3", 0.08),
    ("io1", 0.125),
    ("io2", 0.125),
    ("st1", 0.045),
    ("sc1", 0.025),
    ("standard", 0.05),
];

const DATABASE_PRICES: &[(&str, f64)] = &[
    ("db.t3.micro", 14.18),
    ("db.t3.small", 28.36),
    ("db.t3.medium", 56.72),
    ("db.t3.large", 113.44),
    ("db.r5.large", 183.96),
    ("db.r5.xlarge", 367.92),
];

fn table(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(name, price)| (name.to_string(), *price))
        .collect()
}

/// Unit prices for every priced resource category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingTable {
    /// Monthly price per instance type
    pub compute: BTreeMap<String, f64>,
    /// Monthly price per GB per volume type
    pub storage_per_gb: BTreeMap<String, f64>,
    pub snapshot_per_gb: f64,
    pub address_monthly: f64,
    /// Monthly price per database class
    pub database: BTreeMap<String, f64>,
    pub default_compute: f64,
    pub default_storage_per_gb: f64,
    pub default_database: f64,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            compute: table(COMPUTE_PRICES),
            storage_per_gb: table(STORAGE_PRICES_PER_GB),
            snapshot_per_gb: SNAPSHOT_PER_GB,
            address_monthly: ADDRESS_MONTHLY,
            database: table(DATABASE_PRICES),
            default_compute: DEFAULT_COMPUTE_MONTHLY,
            default_storage_per_gb: DEFAULT_STORAGE_PER_GB,
            default_database: DEFAULT_DATABASE_MONTHLY,
        }
    }
}

impl PricingTable {
    /// Monthly on-demand price of an instance type
    pub fn compute_monthly(&self, instance_type: &str) -> f64 {
        lookup_or(&self.compute, instance_type, self.default_compute)
    }

    /// Monthly per-GB rate of a volume type
    pub fn storage_rate_per_gb(&self, volume_type: &str) -> f64 {
        lookup_or(&self.storage_per_gb, volume_type, self.default_storage_per_gb)
    }

    /// Monthly cost of a volume of the given type and size
    pub fn volume_monthly(&self, volume_type: &str, size_gb: u64) -> f64 {
        size_gb as f64 * self.storage_rate_per_gb(volume_type)
    }

    /// Monthly cost of a snapshot of the given size
    pub fn snapshot_monthly(&self, size_gb: u64) -> f64 {
        size_gb as f64 * self.snapshot_per_gb
    }

    /// Monthly price of a database class
    pub fn database_monthly(&self, instance_class: &str) -> f64 {
        lookup_or(&self.database, instance_class, self.default_database)
    }
}

fn lookup_or(prices: &BTreeMap<String, f64>, key: &str, default: f64) -> f64 {
    prices.get(key).copied().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_prices() {
        let pricing = PricingTable::default();
        assert_eq!(pricing.compute_monthly("m5.large"), 70.08);
        assert_eq!(pricing.database_monthly("db.t3.medium"), 56.72);
        assert_eq!(pricing.storage_rate_per_gb("gp3"), 0.08);
    }

    #[test]
    fn test_unknown_keys_fall_back() {
        let pricing = PricingTable::default();
        assert_eq!(pricing.compute_monthly("x9.huge"), DEFAULT_COMPUTE_MONTHLY);
        assert_eq!(pricing.database_monthly("db.x9.huge"), DEFAULT_DATABASE_MONTHLY);
        assert_eq!(pricing.storage_rate_per_gb("magnetic"), DEFAULT_STORAGE_PER_GB);
    }

    #[test]
    fn test_volume_and_snapshot_costs() {
        let pricing = PricingTable::default();
        assert!((pricing.volume_monthly("gp2", 100) - 10.0).abs() < 1e-9);
        assert!((pricing.snapshot_monthly(80) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_overridden_fallback() {
        let pricing = PricingTable {
            default_compute: 75.0,
            ..PricingTable::default()
        };
        assert_eq!(pricing.compute_monthly("unknown"), 75.0);
    }
}
