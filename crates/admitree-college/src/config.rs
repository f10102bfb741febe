use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    PlannerError, admission::AdmissionParams, projection::ProjectionParams,
    reward::DEFAULT_DIMINISHING_RETURNS,
};

const DEFAULT_PLANNER_CONFIG_YAML: &str = include_str!("../config/planner.default.yaml");

/// Model constants of the essay planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub hours_per_action: f64,
    pub max_hours_per_school: f64,
    pub cost_per_hour: f64,
    pub monte_carlo_samples: usize,
    pub diminishing_returns: f64,
    pub default_essay_score: f64,
    pub admission: AdmissionParams,
    pub projection: ProjectionParams,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            hours_per_action: 2.0,
            max_hours_per_school: 2.0,
            cost_per_hour: -0.5,
            monte_carlo_samples: 1000,
            diminishing_returns: DEFAULT_DIMINISHING_RETURNS,
            default_essay_score: 700.0,
            admission: AdmissionParams::default(),
            projection: ProjectionParams::default(),
        }
    }
}

impl PlannerConfig {
    /// Parse a planner config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PlannerError> {
        let config: PlannerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a planner config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, PlannerError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_PLANNER_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, PlannerError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub fn validate(&self) -> Result<(), PlannerError> {
        if !self.hours_per_action.is_finite() || self.hours_per_action <= 0.0 {
            return Err(PlannerError::InvalidConfig(
                "hours_per_action must be finite and > 0".to_string(),
            ));
        }
        if !self.max_hours_per_school.is_finite() || self.max_hours_per_school <= 0.0 {
            return Err(PlannerError::InvalidConfig(
                "max_hours_per_school must be finite and > 0".to_string(),
            ));
        }
        if !self.cost_per_hour.is_finite() {
            return Err(PlannerError::InvalidConfig(
                "cost_per_hour must be finite".to_string(),
            ));
        }
        if self.monte_carlo_samples == 0 {
            return Err(PlannerError::InvalidConfig(
                "monte_carlo_samples must be greater than 0".to_string(),
            ));
        }
        if !self.diminishing_returns.is_finite() || !self.default_essay_score.is_finite() {
            return Err(PlannerError::InvalidConfig(
                "diminishing_returns and default_essay_score must be finite".to_string(),
            ));
        }
        self.admission.validate()?;
        self.projection.validate()
    }
}
