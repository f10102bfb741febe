use std::fmt;

use rand::Rng;

use crate::{PlanningDomain, TreeError};

mod rollout_tests;

/// One-shot choice among fixed payoffs: pick an item (cost 1) or stop (cost 0).
#[derive(Debug, Clone)]
pub(crate) struct PickDomain {
    pub payoffs: Vec<f64>,
    pub stop_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pick {
    Item(usize),
    Stop,
}

impl fmt::Display for Pick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pick::Item(i) => write!(f, "item-{i}"),
            Pick::Stop => write!(f, "STOP"),
        }
    }
}

impl PlanningDomain for PickDomain {
    type State = Option<usize>;
    type Action = Pick;
    type Error = TreeError;

    fn stop_action(&self) -> Pick {
        Pick::Stop
    }

    fn available_actions(&self, state: &Option<usize>) -> Vec<Pick> {
        let mut actions = Vec::new();
        if state.is_none() {
            actions.extend((0..self.payoffs.len()).map(Pick::Item));
        }
        actions.push(Pick::Stop);
        actions
    }

    fn apply_action(
        &self,
        state: &Option<usize>,
        action: &Pick,
    ) -> Result<(Option<usize>, f64), TreeError> {
        match action {
            Pick::Item(i) => Ok((Some(*i), 1.0)),
            Pick::Stop => Ok((*state, 0.0)),
        }
    }

    fn evaluate<R: Rng + ?Sized>(
        &self,
        state: &Option<usize>,
        _cost: f64,
        _rng: &mut R,
    ) -> Result<f64, TreeError> {
        Ok(match state {
            Some(i) => self.payoffs[*i],
            None => self.stop_value,
        })
    }
}

/// Counter that may be incremented up to `limit` times; worth its count minus half the cost.
#[derive(Debug, Clone)]
pub(crate) struct CounterDomain {
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Increment,
    Stop,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Increment => write!(f, "increment"),
            Step::Stop => write!(f, "STOP"),
        }
    }
}

impl PlanningDomain for CounterDomain {
    type State = u32;
    type Action = Step;
    type Error = TreeError;

    fn stop_action(&self) -> Step {
        Step::Stop
    }

    fn available_actions(&self, state: &u32) -> Vec<Step> {
        if *state < self.limit {
            vec![Step::Increment, Step::Stop]
        } else {
            vec![Step::Stop]
        }
    }

    fn apply_action(&self, state: &u32, action: &Step) -> Result<(u32, f64), TreeError> {
        match action {
            Step::Increment => Ok((state + 1, 1.0)),
            Step::Stop => Ok((*state, 0.0)),
        }
    }

    fn evaluate<R: Rng + ?Sized>(
        &self,
        state: &u32,
        cost: f64,
        _rng: &mut R,
    ) -> Result<f64, TreeError> {
        Ok(*state as f64 - 0.5 * cost)
    }
}
