use crate::tree::{ids::NodeId, stats::NodeStats};

#[derive(Debug, Clone)]
/// Represents one snapshot of the planning state in the search tree.
/// Owns its state copy, knows its parent by id and its children by id.
pub struct Node<S, A> {
    state: S,
    cost: f64,
    depth: u64,
    parent: Option<NodeId>,
    action: Option<A>,
    children: Vec<NodeId>,
    // stored reversed so `pop` hands actions out in the order the domain listed them
    untried_actions: Vec<A>,
    stats: NodeStats,
    is_terminal: bool,
}

impl<S, A> Node<S, A> {
    /// Create a new Node instance.
    /// `available_actions` is the action list of `state` in domain order.
    pub fn new(
        state: S,
        cost: f64,
        depth: u64,
        parent: Option<NodeId>,
        action: Option<A>,
        mut available_actions: Vec<A>,
        is_terminal: bool,
    ) -> Self {
        available_actions.reverse();
        Node {
            state,
            cost,
            depth,
            parent,
            action,
            children: Vec::new(),
            untried_actions: available_actions,
            stats: NodeStats::new(),
            is_terminal,
        }
    }

    /// Borrow the state snapshot of this node
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Cumulative cost spent along the path from the root
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Return the depth of a specific node
    pub fn depth(&self) -> u64 {
        self.depth
    }

    /// Return the parent of a given node
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The action that produced this node, `None` for the root
    pub fn action(&self) -> Option<&A> {
        self.action.as_ref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    /// Actions that have not been expanded yet, next one to expand last.
    pub fn untried_actions(&self) -> &[A] {
        &self.untried_actions
    }

    pub(crate) fn pop_untried(&mut self) -> Option<A> {
        self.untried_actions.pop()
    }

    /// Check if all actions have been tried
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_actions.is_empty()
    }

    /// Check function to see if a node is terminal
    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }

    pub fn visits(&self) -> u64 {
        self.stats.visits()
    }

    pub fn total_reward(&self) -> f64 {
        self.stats.total_reward()
    }

    pub(crate) fn record(&mut self, rollout_reward: f64) {
        self.stats.record(rollout_reward);
    }
}
