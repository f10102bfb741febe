use crate::tree::{
    arena::Arena, domain::PlanningDomain, error::TreeError, ids::NodeId, node::Node,
};

#[derive(Debug, Clone, Copy)]
/// Outcome of the selection and expansion phases of one iteration.
pub struct TreePolicyResult {
    pub leaf: NodeId,   // node where the rollout should start
    pub expanded: bool, // whether `leaf` was created by this call
    pub depth: u64,     // depth of `leaf`
}

/// Visit statistics of one root child, reported after a search.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildSummary<A> {
    pub action: A,
    pub visits: u64,
    pub average_reward: f64,
}

#[derive(Debug, Clone)]
/// owns the arena (root is always at index 0)
/// provides the tree search and operations
pub struct Tree<S, A> {
    arena: Arena<Node<S, A>>,
}

impl<S, A> Tree<S, A>
where
    S: Clone,
    A: Clone + PartialEq + std::fmt::Display,
{
    /// Create a tree with a single root node holding `root_state`.
    pub fn new<D>(domain: &D, root_state: S) -> Self
    where
        D: PlanningDomain<State = S, Action = A>,
    {
        let mut arena = Arena::new();
        let root = Self::make_node(domain, root_state, 0.0, 0, None, None);
        let _ = arena.allocate(root);
        Tree { arena }
    }

    fn make_node<D>(
        domain: &D,
        state: S,
        cost: f64,
        depth: u64,
        parent: Option<NodeId>,
        action: Option<A>,
    ) -> Node<S, A>
    where
        D: PlanningDomain<State = S, Action = A>,
    {
        let stopped = action.as_ref().is_some_and(|a| domain.is_stop(a));
        let available = domain.available_actions(&state);
        let only_stop = available.iter().all(|a| domain.is_stop(a));

        let (untried, is_terminal) = if stopped || only_stop {
            (vec![domain.stop_action()], true)
        } else {
            (available, false)
        };

        Node::new(state, cost, depth, parent, action, untried, is_terminal)
    }

    /// Return the root node id.
    pub fn root_id(&self) -> NodeId {
        NodeId::from(0)
    }

    /// Return how many nodes exist in the tree arena.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Return an immutable node handle.
    pub fn node(&self, node_id: NodeId) -> Result<&Node<S, A>, TreeError> {
        self.arena
            .get(node_id)
            .ok_or(TreeError::MissingNode { node_id })
    }

    /// Return a mutable node handle.
    pub(crate) fn node_mut(&mut self, node_id: NodeId) -> Result<&mut Node<S, A>, TreeError> {
        self.arena
            .get_mut(node_id)
            .ok_or(TreeError::MissingNode { node_id })
    }

    pub(crate) fn nodes(&self) -> impl Iterator<Item = &Node<S, A>> {
        self.arena.iter()
    }

    /// Pick the child of `node_id` with the highest UCB1 score.
    /// Ties go to the child expanded first.
    pub fn select_child(
        &self,
        node_id: NodeId,
        exploitation_weight: f64,
        exploration_weight: f64,
    ) -> Result<NodeId, TreeError> {
        let node = self.node(node_id)?;
        let parent_visits = node.visits();

        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in node.children() {
            let child = self.node(child_id)?;
            let score = child
                .stats()
                .ucb1(parent_visits, exploitation_weight, exploration_weight);
            best = match best {
                Some((_, best_score)) if best_score >= score => best,
                _ => Some((child_id, score)),
            };
        }

        best.map(|(child_id, _)| child_id)
            .ok_or(TreeError::ActionSelectionFailed { node_id })
    }

    /// Expand one untried action of `node_id` into a new child and return its id.
    pub fn expand<D>(&mut self, domain: &D, node_id: NodeId) -> Result<NodeId, D::Error>
    where
        D: PlanningDomain<State = S, Action = A>,
    {
        let action = self
            .node_mut(node_id)?
            .pop_untried()
            .ok_or(TreeError::NothingToExpand { node_id })?;

        let (state, cost, depth) = {
            let parent = self.node(node_id)?;
            let (state, spent) = domain.apply_action(parent.state(), &action)?;
            (state, parent.cost() + spent, parent.depth() + 1)
        };

        log::debug!("expanded node {} with action {action}", node_id.index());
        let child = Self::make_node(domain, state, cost, depth, Some(node_id), Some(action));
        let child_id = self.arena.allocate(child);
        self.node_mut(node_id)?.push_child(child_id);
        Ok(child_id)
    }

    /// Record `reward` on `from` and every ancestor up to the root inclusive.
    /// Returns how many nodes were updated.
    pub fn backpropagate(&mut self, from: NodeId, reward: f64) -> Result<usize, TreeError> {
        let mut current = Some(from);
        let mut touched = 0;
        while let Some(node_id) = current {
            let node = self.node_mut(node_id)?;
            node.record(reward);
            touched += 1;
            current = node.parent();
        }
        Ok(touched)
    }

    /// Descend from the root through fully expanded non-terminal nodes using UCB1,
    /// then expand one child if the node reached still has untried actions.
    pub fn tree_policy<D>(
        &mut self,
        domain: &D,
        exploitation_weight: f64,
        exploration_weight: f64,
    ) -> Result<TreePolicyResult, D::Error>
    where
        D: PlanningDomain<State = S, Action = A>,
    {
        let mut current = self.root_id();

        loop {
            let node = self.node(current)?;
            if node.is_terminal() || !node.is_fully_expanded() || node.children().is_empty() {
                break;
            }
            current = self.select_child(current, exploitation_weight, exploration_weight)?;
        }

        let (expandable, depth) = {
            let node = self.node(current)?;
            (
                !node.is_terminal() && !node.is_fully_expanded(),
                node.depth(),
            )
        };

        if expandable {
            let leaf = self.expand(domain, current)?;
            return Ok(TreePolicyResult {
                leaf,
                expanded: true,
                depth: depth + 1,
            });
        }

        Ok(TreePolicyResult {
            leaf: current,
            expanded: false,
            depth,
        })
    }

    /// Pick the root action with the highest mean reward.
    /// Unvisited children count as a mean of `0.0`; ties go to the child expanded first.
    pub fn best_root_action(&self) -> Result<Option<A>, TreeError> {
        let root = self.node(self.root_id())?;
        let mut best: Option<(&A, f64)> = None;

        for &child_id in root.children() {
            let child = self.node(child_id)?;
            let Some(action) = child.action() else {
                continue;
            };
            let mean = child.stats().mean();
            best = match best {
                Some((_, best_mean)) if best_mean >= mean => best,
                _ => Some((action, mean)),
            };
        }

        Ok(best.map(|(action, _)| action.clone()))
    }

    /// Visit statistics of every root child, highest average reward first.
    pub fn root_summaries(&self) -> Result<Vec<ChildSummary<A>>, TreeError> {
        let root = self.node(self.root_id())?;
        let mut summaries = Vec::with_capacity(root.children().len());

        for &child_id in root.children() {
            let child = self.node(child_id)?;
            if let Some(action) = child.action() {
                summaries.push(ChildSummary {
                    action: action.clone(),
                    visits: child.visits(),
                    average_reward: child.stats().mean(),
                });
            }
        }

        summaries.sort_by(|a, b| b.average_reward.total_cmp(&a.average_reward));
        Ok(summaries)
    }
}
