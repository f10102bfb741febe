mod admission;
mod config;
mod domain;
mod error;
mod io;
mod percentile;
mod planner;
mod projection;
mod reward;
mod school;
mod student;

pub use admission::{AdmissionModel, AdmissionParams};
pub use config::PlannerConfig;
pub use domain::{CollegeDomain, PlanAction, PlanState, STOP_ACTION};
pub use error::PlannerError;
pub use io::{
    catalog_from_json, load_catalog, load_sat_table, load_student, sat_table_from_reader,
};
pub use percentile::{
    ESSAY_SCORE_MEAN, ESSAY_SCORE_STD_DEV, EssayPopulation, SatPercentileTable, essay_percentile,
};
pub use planner::{Planner, Recommendation};
pub use projection::{
    FitError, LogCurve, ProjectionParams, ScoreProjection, fit_log_curve, linear_extrapolation,
};
pub use reward::{DEFAULT_DIMINISHING_RETURNS, reward};
pub use school::{Catalog, School};
pub use student::{Checkpoint, Student};
