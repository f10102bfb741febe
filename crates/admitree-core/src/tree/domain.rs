use std::fmt;

use rand::Rng;

use crate::tree::error::TreeError;

/// Generic interface for a sequential decision problem searched by the tree.
///
/// The tree never inspects states directly. It asks the domain which actions
/// exist, how a state changes under an action and how much a final state is
/// worth. Every node keeps its own copy of the state returned by
/// [`PlanningDomain::apply_action`].
pub trait PlanningDomain {
    type State: Clone;
    type Action: Clone + PartialEq + fmt::Display;
    type Error: From<TreeError>;

    /// The sentinel action that ends a plan.
    fn stop_action(&self) -> Self::Action;

    /// Return whether `action` is the stop sentinel.
    fn is_stop(&self, action: &Self::Action) -> bool {
        *action == self.stop_action()
    }

    /// Actions available in `state`. The stop sentinel is always present and always last.
    fn available_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Apply `action` to a copy of `state`, returning the new state and the cost it spent.
    fn apply_action(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Result<(Self::State, f64), Self::Error>;

    /// Estimate the value of ending in `state` after spending `cost` in total.
    fn evaluate<R: Rng + ?Sized>(
        &self,
        state: &Self::State,
        cost: f64,
        rng: &mut R,
    ) -> Result<f64, Self::Error>;
}
