use rand::{Rng, seq::SliceRandom};

use crate::tree::domain::PlanningDomain;

/// Rollout parameters controlling the random default policy.
#[derive(Debug, Clone, Copy)]
pub struct RolloutParams {
    /// Chance of stopping early while non-stop actions are still available.
    pub early_stop_probability: f64,
    /// Hard cap on the number of actions a single rollout may apply.
    pub max_steps: usize,
}

/// Result of one rollout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RolloutResult {
    /// Actions applied by the default policy.
    pub steps: usize,
    /// Cumulative cost of the final state, including the cost of the start node.
    pub cost: f64,
    /// Value returned by the domain for the final state.
    pub reward: f64,
}

/// Run a default-policy rollout from `start`, whose cumulative cost is `start_cost`.
///
/// While a non-stop action is available the policy flips an early-stop coin,
/// otherwise picks uniformly among the non-stop actions. The final state is
/// valued by [`PlanningDomain::evaluate`].
///
/// The policy acts on whatever `start` offers, even when the node holding it is
/// terminal in the tree: a stop child carries its parent's state and keeps going.
pub fn rollout<D, R>(
    domain: &D,
    start: &D::State,
    start_cost: f64,
    rng: &mut R,
    params: RolloutParams,
) -> Result<RolloutResult, D::Error>
where
    D: PlanningDomain,
    R: Rng + ?Sized,
{
    let mut state = start.clone();
    let mut cost = start_cost;
    let mut steps = 0;

    while steps < params.max_steps {
        let candidates: Vec<D::Action> = domain
            .available_actions(&state)
            .into_iter()
            .filter(|action| !domain.is_stop(action))
            .collect();

        if candidates.is_empty() {
            break;
        }
        if rng.gen_bool(params.early_stop_probability) {
            break;
        }

        let Some(action) = candidates.choose(rng) else {
            break;
        };
        let (next, spent) = domain.apply_action(&state, action)?;
        state = next;
        cost += spent;
        steps += 1;
    }

    let reward = domain.evaluate(&state, cost, rng)?;
    Ok(RolloutResult {
        steps,
        cost,
        reward,
    })
}
