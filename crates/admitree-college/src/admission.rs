//! Heuristic admission model.
//!
//! Blends SAT, GPA and essay percentiles in probit space and compares the
//! blend against the selectivity of the school. This is a percentile-blending
//! heuristic, not a calibrated statistical fit: the weights and the probit
//! scale are tunable constants.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::{Catalog, PlannerError, SatPercentileTable, percentile::EssayPopulation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Tunable constants of the admission model.
pub struct AdmissionParams {
    pub sat_weight: f64,
    pub gpa_weight: f64,
    pub essay_weight: f64,
    /// Divisor of the z-score gap; smaller values make the fall-off sharper.
    pub probit_scale: f64,
    /// Percentiles are clamped into `(epsilon, 1 - epsilon)` before the probit.
    pub percentile_epsilon: f64,
    pub essay_population: EssayPopulation,
}

impl Default for AdmissionParams {
    fn default() -> Self {
        AdmissionParams {
            sat_weight: 0.25,
            gpa_weight: 0.25,
            essay_weight: 0.5,
            probit_scale: 0.5,
            percentile_epsilon: 1e-6,
            essay_population: EssayPopulation::default(),
        }
    }
}

impl AdmissionParams {
    pub(crate) fn validate(&self) -> Result<(), PlannerError> {
        for (name, weight) in [
            ("sat_weight", self.sat_weight),
            ("gpa_weight", self.gpa_weight),
            ("essay_weight", self.essay_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(PlannerError::InvalidConfig(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if !self.probit_scale.is_finite() || self.probit_scale <= 0.0 {
            return Err(PlannerError::InvalidConfig(
                "probit_scale must be finite and > 0".to_string(),
            ));
        }
        if !(self.percentile_epsilon > 0.0 && self.percentile_epsilon < 0.5) {
            return Err(PlannerError::InvalidConfig(
                "percentile_epsilon must be within (0, 0.5)".to_string(),
            ));
        }
        let population = &self.essay_population;
        if !population.mean.is_finite()
            || !population.std_dev.is_finite()
            || population.std_dev <= 0.0
        {
            return Err(PlannerError::InvalidConfig(
                "essay population needs a finite mean and a positive std_dev".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// Admission probability for one student at one school.
pub struct AdmissionModel {
    sat_table: SatPercentileTable,
    params: AdmissionParams,
    standard: Normal,
}

impl AdmissionModel {
    pub fn new(
        sat_table: SatPercentileTable,
        params: AdmissionParams,
    ) -> Result<Self, PlannerError> {
        params.validate()?;
        Ok(AdmissionModel {
            sat_table,
            params,
            standard: Normal::standard(),
        })
    }

    pub fn sat_table(&self) -> &SatPercentileTable {
        &self.sat_table
    }

    pub fn params(&self) -> &AdmissionParams {
        &self.params
    }

    fn probit(&self, percentile: f64) -> f64 {
        let eps = self.params.percentile_epsilon;
        self.standard.inverse_cdf(percentile.clamp(eps, 1.0 - eps))
    }

    /// Blended z-score of a student profile.
    pub fn student_z(
        &self,
        sat_score: u32,
        gpa_percentile: f64,
        essay_score: f64,
    ) -> Result<f64, PlannerError> {
        if !gpa_percentile.is_finite() {
            return Err(PlannerError::InvalidPercentile {
                field: "gpa_percentile",
                value: gpa_percentile,
            });
        }
        let sat_p = self.sat_table.percentile(sat_score)?;
        let essay_p = self.params.essay_population.percentile(essay_score);
        if essay_p.is_nan() {
            return Err(PlannerError::InvalidPercentile {
                field: "essay_percentile",
                value: essay_p,
            });
        }

        Ok(self.params.sat_weight * self.probit(sat_p)
            + self.params.gpa_weight * self.probit(gpa_percentile)
            + self.params.essay_weight * self.probit(essay_p))
    }

    /// Probability of admission to `school`, looked up in `catalog` by exact name.
    pub fn probability(
        &self,
        catalog: &Catalog,
        school: &str,
        sat_score: u32,
        gpa_percentile: f64,
        essay_score: f64,
    ) -> Result<f64, PlannerError> {
        let z_student = self.student_z(sat_score, gpa_percentile, essay_score)?;
        let acceptance_rate = catalog.require(school)?.acceptance_rate;

        // Open-ended selectivity thresholds.
        if acceptance_rate <= 0.0 {
            return Ok(0.0);
        }
        if acceptance_rate >= 100.0 {
            return Ok(1.0);
        }

        let z_school = self.standard.inverse_cdf(1.0 - acceptance_rate / 100.0);
        Ok(1.0 - self.standard.cdf((z_school - z_student) / self.params.probit_scale))
    }
}
