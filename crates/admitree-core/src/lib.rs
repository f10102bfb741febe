mod tree;

pub use tree::budget::{Budget, Deadline, IterationBudget};
pub use tree::domain::PlanningDomain;
pub use tree::error::TreeError;
pub use tree::ids::NodeId;
pub use tree::mcts::{
    IterationMetrics, RunMetrics, SearchConfig, SearchConfigError, SearchOutcome, SearchPhase,
};
pub use tree::node::Node;
pub use tree::rollout::{RolloutParams, RolloutResult, rollout};
pub use tree::search_tree::{ChildSummary, Tree, TreePolicyResult};
pub use tree::snapshot::{NodeSnapshot, TreeSnapshot};
pub use tree::stats::NodeStats;
