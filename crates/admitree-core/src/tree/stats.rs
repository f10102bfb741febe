/// Stores the numbers MCTS updates constantly on every backpropagation pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeStats {
    visits: u64,
    total_reward: f64,
}

impl NodeStats {
    pub fn new() -> Self {
        NodeStats {
            visits: 0,
            total_reward: 0.0,
        }
    }

    /// Retrieve the amount of rollouts that passed through this node
    pub fn visits(&self) -> u64 {
        self.visits
    }

    /// Increase the visit counter by 1.
    fn record_visit(&mut self) {
        self.visits += 1;
    }

    /// Retrieve the accumulated reward of all rollouts through this node.
    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    fn record_reward(&mut self, rollout_reward: f64) {
        self.total_reward += rollout_reward
    }

    /// Function to be used for backpropagation.
    /// Immediately records the rollout reward and increments the visits.
    pub fn record(&mut self, rollout_reward: f64) {
        self.record_visit();
        self.record_reward(rollout_reward);
    }

    /// Helper function just to check if the node has been visited or not
    pub fn is_unvisited(&self) -> bool {
        self.visits == 0
    }

    /// Average reward, `0.0` for an unvisited node.
    pub fn mean(&self) -> f64 {
        if self.is_unvisited() {
            0.0
        } else {
            self.total_reward / self.visits as f64
        }
    }

    /// UCB1 score of a child with these stats under a parent visited `parent_visits` times.
    /// Unvisited children score `+inf` so every child is tried once before comparisons.
    pub fn ucb1(
        &self,
        parent_visits: u64,
        exploitation_weight: f64,
        exploration_weight: f64,
    ) -> f64 {
        if self.is_unvisited() {
            return f64::INFINITY;
        }
        let visits = self.visits as f64;
        exploitation_weight * (self.total_reward / visits)
            + exploration_weight * f64::sqrt(f64::ln(parent_visits as f64) / visits)
    }
}
