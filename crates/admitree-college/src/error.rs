use admitree_core::{SearchConfigError, TreeError};
use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for model evaluation, catalog loading and planning.
pub enum PlannerError {
    #[error("unknown school '{name}'")]
    UnknownSchool { name: String },

    #[error("SAT score {score} is not in the percentile table")]
    SatScoreNotInTable { score: u32 },

    #[error("SAT score {score} maps to percentile {percentile}, expected 0..=100")]
    InvalidSatPercentile { score: u32, percentile: u32 },

    #[error("school '{name}' has acceptance rate {rate}, expected a value within [0, 100]")]
    InvalidAcceptanceRate { name: String, rate: f64 },

    #[error("{field} must be finite and within [0, 1], got {value}")]
    InvalidPercentile { field: &'static str, value: f64 },

    #[error("duplicate school name '{name}' in catalog")]
    DuplicateSchool { name: String },

    #[error("invalid planner config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    SearchConfig(#[from] SearchConfigError),

    #[error("search tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
