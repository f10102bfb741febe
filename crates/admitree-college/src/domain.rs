use std::{fmt, sync::Arc};

use admitree_core::PlanningDomain;
use rand::Rng;

use crate::{
    AdmissionModel, Catalog, PlannerConfig, PlannerError, SatPercentileTable, ScoreProjection,
    Student, reward::reward,
};

/// Label of the action that ends the plan.
pub const STOP_ACTION: &str = "STOP";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// One planning decision: spend another block of hours on a school, or stop.
pub enum PlanAction {
    Work(String),
    Stop,
}

impl PlanAction {
    /// School worked on, `None` for [`PlanAction::Stop`].
    pub fn school(&self) -> Option<&str> {
        match self {
            PlanAction::Work(name) => Some(name),
            PlanAction::Stop => None,
        }
    }
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanAction::Work(name) => f.write_str(name),
            PlanAction::Stop => f.write_str(STOP_ACTION),
        }
    }
}

#[derive(Debug, Clone)]
/// Planning state held by every search node.
///
/// The student is an owned copy per node. The catalog is shared read-only;
/// a future action that edits schools would copy it with `Arc::make_mut`.
pub struct PlanState {
    pub student: Student,
    pub schools: Arc<Catalog>,
}

impl PlanState {
    pub fn new(student: Student, schools: Arc<Catalog>) -> Self {
        PlanState { student, schools }
    }
}

#[derive(Debug, Clone)]
/// College essay planning problem: models plus the constants that tie them together.
pub struct CollegeDomain {
    admission: AdmissionModel,
    projection: ScoreProjection,
    config: PlannerConfig,
}

impl CollegeDomain {
    pub fn new(
        sat_table: SatPercentileTable,
        config: PlannerConfig,
    ) -> Result<Self, PlannerError> {
        config.validate()?;
        Ok(CollegeDomain {
            admission: AdmissionModel::new(sat_table, config.admission.clone())?,
            projection: ScoreProjection::new(config.projection.clone())?,
            config,
        })
    }

    pub fn admission(&self) -> &AdmissionModel {
        &self.admission
    }

    pub fn projection(&self) -> &ScoreProjection {
        &self.projection
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Check the caller preconditions on a student before searching.
    pub fn validate_student(&self, student: &Student) -> Result<(), PlannerError> {
        self.admission.sat_table().percentile(student.sat_score)?;
        if !(0.0..=1.0).contains(&student.gpa_percentile) {
            return Err(PlannerError::InvalidPercentile {
                field: "gpa_percentile",
                value: student.gpa_percentile,
            });
        }
        Ok(())
    }

    /// Admission probability for every school still applied to, in catalog order.
    pub fn admission_chances(
        &self,
        state: &PlanState,
    ) -> Result<Vec<(String, f64)>, PlannerError> {
        let student = &state.student;
        state
            .schools
            .applying()
            .map(|school| -> Result<(String, f64), PlannerError> {
                let essay_score = student
                    .essay_score(&school.name)
                    .unwrap_or(self.config.default_essay_score);
                let p = self.admission.probability(
                    &state.schools,
                    &school.name,
                    student.sat_score,
                    student.gpa_percentile,
                    essay_score,
                )?;
                Ok((school.name.clone(), p))
            })
            .collect()
    }

    /// Monte Carlo estimate of the admission reward of `state`, minus the cost of `hours`.
    pub fn expected_reward<R: Rng + ?Sized>(
        &self,
        state: &PlanState,
        hours: f64,
        rng: &mut R,
    ) -> Result<f64, PlannerError> {
        let chances = self.admission_chances(state)?;
        let samples = self.config.monte_carlo_samples;

        let mut admitted: Vec<&str> = Vec::with_capacity(chances.len());
        let mut total = 0.0;
        for _ in 0..samples {
            admitted.clear();
            for (name, p) in &chances {
                if rng.r#gen::<f64>() < *p {
                    admitted.push(name);
                }
            }
            total += reward(&admitted, &state.schools, self.config.diminishing_returns);
        }

        Ok(total / samples as f64 + self.config.cost_per_hour * hours)
    }
}

impl PlanningDomain for CollegeDomain {
    type State = PlanState;
    type Action = PlanAction;
    type Error = PlannerError;

    fn stop_action(&self) -> PlanAction {
        PlanAction::Stop
    }

    /// Applied-to schools with less than `max_hours_per_school` invested, then STOP.
    fn available_actions(&self, state: &PlanState) -> Vec<PlanAction> {
        let mut actions: Vec<PlanAction> = state
            .schools
            .applying()
            .filter(|school| {
                state.student.hours_invested(&school.name) < self.config.max_hours_per_school
            })
            .map(|school| PlanAction::Work(school.name.clone()))
            .collect();
        actions.push(PlanAction::Stop);
        actions
    }

    fn apply_action(
        &self,
        state: &PlanState,
        action: &PlanAction,
    ) -> Result<(PlanState, f64), PlannerError> {
        let Some(school) = action.school() else {
            return Ok((state.clone(), 0.0));
        };
        state.schools.require(school)?;

        let mut next = state.clone();
        let score = self.projection.project(next.student.history(school));
        next.student
            .record_work(school, self.config.hours_per_action, score);
        Ok((next, self.config.hours_per_action))
    }

    fn evaluate<R: Rng + ?Sized>(
        &self,
        state: &PlanState,
        cost: f64,
        rng: &mut R,
    ) -> Result<f64, PlannerError> {
        self.expected_reward(state, cost, rng)
    }
}
