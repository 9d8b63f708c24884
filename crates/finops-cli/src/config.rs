//! Configuration management for the CLI

use anyhow::{Context, Result};
use finops_core::AnalysisConfig;
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `FINOPS__IDLE_CPU_THRESHOLD=10`
const ENV_PREFIX: &str = "FINOPS";

/// Load the analysis configuration
///
/// Layers, lowest precedence first: built-in defaults, the TOML file
/// (explicit path, else the default path when it exists), then `FINOPS__*`
/// environment variables with `__` separating nested keys.
pub fn load(explicit: Option<&Path>) -> Result<AnalysisConfig> {
    let mut builder = config::Config::builder();

    match explicit {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            builder = builder.add_source(config::File::from(path).required(true));
        }
        None => {
            if let Some(path) = default_path() {
                builder = builder.add_source(config::File::from(path).required(false));
            }
        }
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to read configuration")?;

    settings
        .try_deserialize()
        .context("Failed to parse configuration")
}

/// Default config file location: `~/.config/finops/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs_next::home_dir().map(|home| home.join(".config").join("finops").join("config.toml"))
}
