use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Essay score observed after a cumulative number of hours of work.
pub struct Checkpoint {
    pub hours: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Snapshot of one student's profile and essay progress.
pub struct Student {
    /// Raw SAT score, a multiple of 10.
    pub sat_score: u32,
    /// Unused by the admission model, kept for callers.
    pub gpa: f64,
    pub gpa_percentile: f64,
    /// Latest projected essay score per school.
    #[serde(default)]
    pub application_scores: BTreeMap<String, f64>,
    /// Chronological checkpoints per school, hours non-decreasing.
    #[serde(default)]
    pub application_score_history: BTreeMap<String, Vec<Checkpoint>>,
}

impl Student {
    /// Create a student with no essay work recorded yet.
    pub fn new(sat_score: u32, gpa: f64, gpa_percentile: f64) -> Self {
        Student {
            sat_score,
            gpa,
            gpa_percentile,
            application_scores: BTreeMap::new(),
            application_score_history: BTreeMap::new(),
        }
    }

    /// Checkpoints recorded for `school`, empty if none.
    pub fn history(&self, school: &str) -> &[Checkpoint] {
        self.application_score_history
            .get(school)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Hours invested in `school` so far: the largest checkpoint hour, or `0.0`.
    pub fn hours_invested(&self, school: &str) -> f64 {
        self.history(school)
            .iter()
            .map(|point| point.hours)
            .fold(0.0, f64::max)
    }

    /// Latest projected essay score for `school`, if any work was projected.
    pub fn essay_score(&self, school: &str) -> Option<f64> {
        self.application_scores.get(school).copied()
    }

    /// Append a checkpoint `hours_spent` after the current investment and make `score` current.
    pub fn record_work(&mut self, school: &str, hours_spent: f64, score: f64) {
        let hours = self.hours_invested(school) + hours_spent;
        self.application_score_history
            .entry(school.to_string())
            .or_default()
            .push(Checkpoint { hours, score });
        self.application_scores.insert(school.to_string(), score);
    }
}
