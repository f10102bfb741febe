use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::PlannerError;

/// Mean of the essay score population.
pub const ESSAY_SCORE_MEAN: f64 = 1032.45;
/// Standard deviation of the essay score population.
pub const ESSAY_SCORE_STD_DEV: f64 = 66.52;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Normal model of the essay score population.
pub struct EssayPopulation {
    pub mean: f64,
    pub std_dev: f64,
}

impl Default for EssayPopulation {
    fn default() -> Self {
        EssayPopulation {
            mean: ESSAY_SCORE_MEAN,
            std_dev: ESSAY_SCORE_STD_DEV,
        }
    }
}

impl EssayPopulation {
    /// Share of the population scoring at or below `score`.
    pub fn percentile(&self, score: f64) -> f64 {
        Normal::standard().cdf((score - self.mean) / self.std_dev)
    }
}

/// Essay percentile under the default population.
pub fn essay_percentile(score: f64) -> f64 {
    EssayPopulation::default().percentile(score)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Exact-key lookup from SAT score to population percentile (0..=100).
pub struct SatPercentileTable {
    entries: BTreeMap<u32, u8>,
}

impl SatPercentileTable {
    /// Build a table from `(score, percentile)` pairs. Later duplicates win.
    pub fn new(pairs: impl IntoIterator<Item = (u32, u32)>) -> Result<Self, PlannerError> {
        let mut entries = BTreeMap::new();
        for (score, percentile) in pairs {
            let value = u8::try_from(percentile)
                .ok()
                .filter(|value| *value <= 100)
                .ok_or(PlannerError::InvalidSatPercentile { score, percentile })?;
            entries.insert(score, value);
        }
        Ok(SatPercentileTable { entries })
    }

    /// Percentile of `score` as a fraction in [0, 1]. No interpolation.
    pub fn percentile(&self, score: u32) -> Result<f64, PlannerError> {
        self.entries
            .get(&score)
            .map(|percentile| f64::from(*percentile) / 100.0)
            .ok_or(PlannerError::SatScoreNotInTable { score })
    }

    pub fn contains(&self, score: u32) -> bool {
        self.entries.contains_key(&score)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
