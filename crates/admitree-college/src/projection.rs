//! Essay score projection from a student's own checkpoints.
//!
//! Short histories use fixed rules. Three or more checkpoints are fitted with
//! `a * ln(x + b) + c` by Levenberg-Marquardt; when the fit does not converge
//! the projection falls back to extrapolating the last two checkpoints.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{PlannerError, student::Checkpoint};

const MIN_HOUR_GAP: f64 = 1e-6;

const INITIAL_DAMPING: f64 = 1e-3;
const MAX_DAMPING: f64 = 1e16;
const MIN_DIAGONAL: f64 = 1e-12;
const COST_TOLERANCE: f64 = 1e-12;
const STEP_TOLERANCE: f64 = 1e-10;
const GRADIENT_TOLERANCE: f64 = 1e-9;
const RESIDUAL_FLOOR: f64 = 1e-18;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Constants of the projection rules.
pub struct ProjectionParams {
    /// Score assumed for a school with no checkpoints.
    pub baseline_score: f64,
    /// Points per hour assumed from a single checkpoint.
    pub single_point_rate: f64,
    /// How many more hours the projection looks ahead.
    pub projection_hours: f64,
    /// Outer iteration budget of the curve fit.
    pub fit_max_iterations: usize,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        ProjectionParams {
            baseline_score: 800.0,
            single_point_rate: 7.0,
            projection_hours: 2.0,
            fit_max_iterations: 200,
        }
    }
}

impl ProjectionParams {
    pub(crate) fn validate(&self) -> Result<(), PlannerError> {
        if !self.baseline_score.is_finite() || !self.single_point_rate.is_finite() {
            return Err(PlannerError::InvalidConfig(
                "baseline_score and single_point_rate must be finite".to_string(),
            ));
        }
        if !self.projection_hours.is_finite() || self.projection_hours <= 0.0 {
            return Err(PlannerError::InvalidConfig(
                "projection_hours must be finite and > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// `a * ln(x + b) + c` with `b > 0`.
pub struct LogCurve {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl LogCurve {
    pub fn eval(&self, x: f64) -> f64 {
        self.a * (x + self.b).ln() + self.c
    }

    fn from_params(params: [f64; 3]) -> Self {
        LogCurve {
            a: params[0],
            b: params[1],
            c: params[2],
        }
    }

    fn params(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
/// Reasons a curve fit is abandoned.
pub enum FitError {
    #[error("need at least 3 points to fit, got {0}")]
    TooFewPoints(usize),
    #[error("initial offset b must be > 0 and every x + b must be positive")]
    NonPositiveOffset,
    #[error("fit did not converge within {0} iterations")]
    NoConvergence(usize),
    #[error("normal equations are singular")]
    Singular,
    #[error("fit produced a non-finite value")]
    NonFinite,
}

fn sum_squares(points: &[(f64, f64)], curve: &LogCurve) -> Option<f64> {
    let mut total = 0.0;
    for &(x, y) in points {
        let shifted = x + curve.b;
        if shifted <= 0.0 {
            return None;
        }
        let residual = y - curve.eval(x);
        total += residual * residual;
    }
    total.is_finite().then_some(total)
}

/// Solve a 3x3 system by Gaussian elimination with partial pivoting.
fn solve3(mut m: [[f64; 3]; 3], mut rhs: [f64; 3]) -> Option<[f64; 3]> {
    for col in 0..3 {
        let pivot = (col..3).max_by(|&i, &j| m[i][col].abs().total_cmp(&m[j][col].abs()))?;
        if m[pivot][col].abs() < f64::MIN_POSITIVE {
            return None;
        }
        m.swap(col, pivot);
        rhs.swap(col, pivot);

        for row in col + 1..3 {
            let factor = m[row][col] / m[col][col];
            for k in col..3 {
                m[row][k] -= factor * m[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = [0.0; 3];
    for row in (0..3).rev() {
        let tail: f64 = (row + 1..3).map(|k| m[row][k] * solution[k]).sum();
        solution[row] = (rhs[row] - tail) / m[row][row];
    }
    solution.iter().all(|v| v.is_finite()).then_some(solution)
}

/// Least-squares fit of a [`LogCurve`] to `(x, y)` points, keeping `b > 0`.
///
/// Each outer iteration builds the normal equations at the current estimate and
/// raises the damping until a step lowers the residual. Running out of
/// `max_iterations` outer iterations is a [`FitError::NoConvergence`].
pub fn fit_log_curve(
    points: &[(f64, f64)],
    initial: LogCurve,
    max_iterations: usize,
) -> Result<LogCurve, FitError> {
    if points.len() < 3 {
        return Err(FitError::TooFewPoints(points.len()));
    }
    if initial.b <= 0.0 {
        return Err(FitError::NonPositiveOffset);
    }

    let mut curve = initial;
    let mut cost = sum_squares(points, &curve).ok_or(FitError::NonPositiveOffset)?;
    let mut damping = INITIAL_DAMPING;

    for _ in 0..max_iterations {
        if cost <= RESIDUAL_FLOOR {
            return Ok(curve);
        }

        let mut jtj = [[0.0; 3]; 3];
        let mut jtr = [0.0; 3];
        for &(x, y) in points {
            let shifted = x + curve.b;
            let gradient = [shifted.ln(), curve.a / shifted, 1.0];
            let residual = y - curve.eval(x);
            for i in 0..3 {
                jtr[i] += gradient[i] * residual;
                for j in 0..3 {
                    jtj[i][j] += gradient[i] * gradient[j];
                }
            }
        }
        if jtr.iter().all(|g| g.abs() <= GRADIENT_TOLERANCE) {
            return Ok(curve);
        }

        loop {
            let mut damped = jtj;
            for (i, row) in damped.iter_mut().enumerate() {
                row[i] += damping * jtj[i][i].max(MIN_DIAGONAL);
            }
            let step = solve3(damped, jtr).ok_or(FitError::Singular)?;

            let current = curve.params();
            let candidate = LogCurve::from_params([
                current[0] + step[0],
                current[1] + step[1],
                current[2] + step[2],
            ]);

            let improved = if candidate.b > 0.0 {
                sum_squares(points, &candidate).filter(|new_cost| *new_cost < cost)
            } else {
                None
            };

            match improved {
                Some(new_cost) => {
                    let step_norm = step.iter().map(|s| s * s).sum::<f64>().sqrt();
                    let param_norm = current.iter().map(|p| p * p).sum::<f64>().sqrt();
                    let converged = cost - new_cost <= COST_TOLERANCE * cost
                        || step_norm <= STEP_TOLERANCE * (param_norm + STEP_TOLERANCE);

                    curve = candidate;
                    cost = new_cost;
                    damping = (damping / 10.0).max(MIN_DIAGONAL);
                    if converged {
                        return Ok(curve);
                    }
                    break;
                }
                None => {
                    damping *= 10.0;
                    // No downhill step left at any damping: a local minimum.
                    if damping > MAX_DAMPING {
                        return Ok(curve);
                    }
                }
            }
        }
    }

    Err(FitError::NoConvergence(max_iterations))
}

/// `last.score + slope * hours` where the slope runs from `previous` to `last`.
pub fn linear_extrapolation(previous: Checkpoint, last: Checkpoint, hours: f64) -> f64 {
    let slope = (last.score - previous.score) / (last.hours - previous.hours).max(MIN_HOUR_GAP);
    last.score + slope * hours
}

#[derive(Debug, Clone, Default)]
/// Projects an essay score a fixed number of hours ahead.
pub struct ScoreProjection {
    params: ProjectionParams,
}

impl ScoreProjection {
    pub fn new(params: ProjectionParams) -> Result<Self, PlannerError> {
        params.validate()?;
        Ok(ScoreProjection { params })
    }

    pub fn params(&self) -> &ProjectionParams {
        &self.params
    }

    /// Projected score after `projection_hours` more hours of work.
    /// `history` is one school's checkpoints in non-decreasing hour order.
    pub fn project(&self, history: &[Checkpoint]) -> f64 {
        let ahead = self.params.projection_hours;
        match history {
            [] => self.params.baseline_score,
            [only] => only.score + self.params.single_point_rate * ahead,
            [previous, last] => linear_extrapolation(*previous, *last, ahead),
            [.., previous, last] => match self.fit_projection(history) {
                Ok(score) => score,
                Err(err) => {
                    log::warn!(
                        "log curve fit failed ({err}), extrapolating the last two checkpoints"
                    );
                    linear_extrapolation(*previous, *last, ahead)
                }
            },
        }
    }

    fn fit_projection(&self, history: &[Checkpoint]) -> Result<f64, FitError> {
        let min_hours = history.iter().map(|p| p.hours).fold(f64::INFINITY, f64::min);
        let max_hours = history.iter().map(|p| p.hours).fold(f64::NEG_INFINITY, f64::max);
        if !min_hours.is_finite() || !max_hours.is_finite() {
            return Err(FitError::NonFinite);
        }

        // Keep every x + b positive for the initial b = 1.
        let shift = (-min_hours).max(0.0);
        let points: Vec<(f64, f64)> = history
            .iter()
            .map(|p| (p.hours + shift, p.score))
            .collect();
        let mean = points.iter().map(|(_, y)| y).sum::<f64>() / points.len() as f64;

        let curve = fit_log_curve(
            &points,
            LogCurve {
                a: 10.0,
                b: 1.0,
                c: mean,
            },
            self.params.fit_max_iterations,
        )?;

        let projected = curve.eval(max_hours + shift + self.params.projection_hours);
        projected.is_finite().then_some(projected).ok_or(FitError::NonFinite)
    }
}
