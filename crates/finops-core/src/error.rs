//! Error types for dataset validation and analysis runs

use thiserror::Error;

use crate::models::ResourceKind;

/// Result alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Engine identifiers, used to name the origin of a failed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    Visibility,
    Waste,
    Optimization,
    Forecast,
    Governance,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Visibility => "visibility",
            Engine::Waste => "waste",
            Engine::Optimization => "optimization",
            Engine::Forecast => "forecast",
            Engine::Governance => "governance",
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dataset that fails structural checks
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be a non-negative amount, got {value}")]
    NegativeCost { field: String, value: f64 },

    #[error("{kind} resource has an empty identifier")]
    EmptyId { kind: ResourceKind },

    #[error("duplicate {kind} identifier '{id}'")]
    DuplicateId { kind: ResourceKind, id: String },

    #[error("{kind} '{id}' has utilization {value} outside 0-100")]
    UtilizationOutOfRange {
        kind: ResourceKind,
        id: String,
        value: f64,
    },
}

/// Errors that abort an analysis run
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid dataset: {0}")]
    Validation(#[from] ValidationError),

    #[error("forecast horizon must be at least one month")]
    InvalidHorizon,

    #[error("{engine} engine failed: {source}")]
    Engine {
        engine: Engine,
        #[source]
        source: Box<AnalysisError>,
    },

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl AnalysisError {
    /// Wrap an error with the engine it escaped from
    pub fn in_engine(self, engine: Engine) -> Self {
        AnalysisError::Engine {
            engine,
            source: Box::new(self),
        }
    }

    /// Engine that raised the error, if it came from one
    pub fn engine(&self) -> Option<Engine> {
        match self {
            AnalysisError::Engine { engine, .. } => Some(*engine),
            _ => None,
        }
    }
}
