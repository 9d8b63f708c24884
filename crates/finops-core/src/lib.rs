//! Cloud cost analysis library
//!
//! This crate provides the rule-based analysis of a cost dataset:
//! - Waste detection (idle and orphaned resources)
//! - Tiered optimization recommendations
//! - Multi-scenario cost forecasting
//! - Tag governance compliance
//! - Cost visibility breakdowns
//! - Orchestration, validation and observability around the engines

pub mod analysis;
pub mod config;
pub mod demo;
pub mod engine;
pub mod error;
pub mod models;
pub mod observability;
pub mod pricing;
mod validation;

pub use analysis::{AnalysisMetadata, AnalysisRequest, AnalysisResult, Analyzer, BottomLine};
pub use config::{AnalysisConfig, ForecastConfig, GovernanceConfig, OptimizationConfig};
pub use error::{AnalysisError, Engine, ValidationError};
pub use models::*;
pub use observability::{AnalysisMetrics, StructuredLogger};
pub use pricing::PricingTable;
