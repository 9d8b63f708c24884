//! Dataset loading

use anyhow::{Context, Result};
use finops_core::demo::demo_dataset;
use finops_core::CostDataset;
use std::path::Path;
use tracing::info;

/// Where the dataset comes from
#[derive(Debug, Clone)]
pub enum DatasetSource<'a> {
    File(&'a Path),
    Demo { region: &'a str },
}

/// Load a dataset from a JSON file or build the demo set
pub fn load(source: DatasetSource<'_>) -> Result<CostDataset> {
    match source {
        DatasetSource::File(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read dataset {}", path.display()))?;
            let dataset: CostDataset = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse dataset {}", path.display()))?;
            info!(
                path = %path.display(),
                account = %dataset.account_id,
                resources = dataset.resource_count(),
                "Loaded dataset"
            );
            Ok(dataset)
        }
        DatasetSource::Demo { region } => {
            info!(region = %region, "Using demo dataset");
            Ok(demo_dataset(region))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"account_id": "123", "region": "eu-west-1",
                "collection_time": "2024-01-01T00:00:00Z",
                "total_monthly_cost": 12.5}}"#
        )
        .unwrap();

        let dataset = load(DatasetSource::File(file.path())).unwrap();
        assert_eq!(dataset.account_id, "123");
        assert_eq!(dataset.region, "eu-west-1");
        assert!(dataset.instances.is_empty());
        assert_eq!(dataset.total_monthly_cost, 12.5);
    }

    #[test]
    fn test_malformed_json_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = load(DatasetSource::File(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse dataset"));
    }

    #[test]
    fn test_demo_uses_region() {
        let dataset = load(DatasetSource::Demo { region: "ap-south-1" }).unwrap();
        assert_eq!(dataset.region, "ap-south-1");
    }
}
