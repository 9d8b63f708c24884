//! FinOps toolkit CLI
//!
//! Analyzes a cloud cost dataset for waste, optimization opportunities,
//! projected spend and tag compliance, and renders the result as a text
//! report or JSON.

mod config;
mod dataset;
mod output;
mod report;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use finops_core::{AnalysisRequest, Analyzer};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dataset::DatasetSource;
use output::{print_info, print_success, OutputFormat};

/// FinOps cost analysis CLI
#[derive(Parser)]
#[command(name = "finops")]
#[command(author, version, about = "Cloud cost analysis and optimization", long_about = None)]
pub struct Cli {
    /// JSON dataset to analyze (can also be set via FINOPS_INPUT env var)
    #[arg(long, short, env = "FINOPS_INPUT", global = true)]
    pub input: Option<PathBuf>,

    /// Analyze the built-in demo dataset (takes precedence over --input)
    #[arg(long, global = true)]
    pub demo: bool,

    /// Region recorded on the demo dataset
    #[arg(long, global = true, default_value = "us-east-1")]
    pub region: String,

    /// Path to a TOML config file (default: ~/.config/finops/config.toml)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Also save the report to FILE, or to a timestamped file with "auto"
    #[arg(long, short, global = true, value_name = "FILE|auto")]
    pub output: Option<String>,

    /// Write Prometheus metrics for the run to FILE
    #[arg(long, global = true, value_name = "FILE")]
    pub metrics_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
pub enum Commands {
    /// Full analysis: visibility, waste, optimization and governance (default)
    Analyze {
        /// Also forecast this many months ahead
        #[arg(long, value_name = "MONTHS", value_parser = clap::value_parser!(u32).range(1..))]
        forecast: Option<u32>,
    },

    /// Show cost breakdowns by service, team and environment
    Visibility,

    /// Detect idle and orphaned resources
    Waste,

    /// Project monthly spend under three scenarios
    Forecast {
        /// Number of months to project
        #[arg(long, short, default_value_t = 12, value_parser = clap::value_parser!(u32).range(1..))]
        months: u32,
    },

    /// Check required-tag compliance
    Governance,
}

impl Commands {
    /// Engines to run for this command
    fn request(self) -> AnalysisRequest {
        match self {
            Commands::Analyze { forecast } => {
                let request = AnalysisRequest::full();
                match forecast {
                    Some(months) => request.with_forecast(months),
                    None => request,
                }
            }
            Commands::Visibility => AnalysisRequest {
                visibility: true,
                ..AnalysisRequest::default()
            },
            Commands::Waste => AnalysisRequest {
                waste: true,
                ..AnalysisRequest::default()
            },
            Commands::Forecast { months } => AnalysisRequest::default().with_forecast(months),
            Commands::Governance => AnalysisRequest {
                governance: true,
                ..AnalysisRequest::default()
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.format);

    let config = config::load(cli.config.as_deref())?;

    let source = if cli.demo {
        DatasetSource::Demo {
            region: &cli.region,
        }
    } else if let Some(path) = cli.input.as_deref() {
        DatasetSource::File(path)
    } else {
        anyhow::bail!("No dataset given: pass --input <FILE> or --demo");
    };
    let dataset = dataset::load(source)?;

    let command = cli.command.unwrap_or(Commands::Analyze { forecast: None });
    let analyzer = Analyzer::new(config).context("Failed to initialize metrics")?;
    let result = analyzer
        .run(&dataset, &command.request())
        .context("Analysis failed")?;

    let rendered = report::render(&result, dataset.total_monthly_cost, cli.format)?;
    println!("{}", rendered);

    if let Some(target) = &cli.output {
        let path = report_path(target, cli.format, Local::now());
        colored::control::set_override(false);
        let plain = report::render(&result, dataset.total_monthly_cost, cli.format);
        colored::control::unset_override();
        std::fs::write(&path, plain?)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        print_success(&format!("Report saved to {}", path.display()));
    }

    if let Some(path) = &cli.metrics_file {
        write_metrics(&analyzer, path)?;
        print_info(&format!("Metrics written to {}", path.display()));
    }

    info!(account = %dataset.account_id, "Done");
    Ok(())
}

/// Install the tracing subscriber on stderr so stdout only carries the report
fn init_tracing(verbose: bool, format: OutputFormat) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let json = format == OutputFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_target(false).with_writer(std::io::stderr)))
        .init();
}

/// Resolve `--output`; "auto" becomes `finops_report_YYYYMMDD_HHMMSS.<ext>`
fn report_path(target: &str, format: OutputFormat, now: DateTime<Local>) -> PathBuf {
    if target == "auto" {
        PathBuf::from(format!(
            "finops_report_{}.{}",
            now.format("%Y%m%d_%H%M%S"),
            format.extension()
        ))
    } else {
        PathBuf::from(target)
    }
}

fn write_metrics(analyzer: &Analyzer, path: &Path) -> Result<()> {
    let text = analyzer
        .metrics()
        .encode_text()
        .context("Failed to encode metrics")?;
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write metrics to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_auto_report_path() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            report_path("auto", OutputFormat::Json, now),
            PathBuf::from("finops_report_20240309_140507.json")
        );
        assert_eq!(
            report_path("auto", OutputFormat::Table, now),
            PathBuf::from("finops_report_20240309_140507.txt")
        );
        assert_eq!(
            report_path("out.txt", OutputFormat::Table, now),
            PathBuf::from("out.txt")
        );
    }

    #[test]
    fn test_default_command_is_full_analysis() {
        let cli = Cli::parse_from(["finops", "--demo"]);
        assert!(cli.command.is_none());
        assert_eq!(
            Commands::Analyze { forecast: None }.request(),
            AnalysisRequest::full()
        );
    }

    #[test]
    fn test_forecast_command_request() {
        let cli = Cli::parse_from(["finops", "forecast", "--months", "6", "--demo"]);
        let request = cli.command.unwrap().request();
        assert_eq!(request.forecast_months, Some(6));
        assert!(!request.waste);
    }

    #[test]
    fn test_zero_months_rejected() {
        assert!(Cli::try_parse_from(["finops", "forecast", "--months", "0"]).is_err());
    }
}
