use std::fmt;

use crate::tree::ids::NodeId;

/// Error type for MCTS tree construction and search operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Attempted to access a node id that does not exist in the arena.
    MissingNode { node_id: NodeId },
    /// Selection was asked to pick among the children of a childless node.
    ActionSelectionFailed { node_id: NodeId },
    /// Expansion was asked to expand a node with no untried actions left.
    NothingToExpand { node_id: NodeId },
    /// The search configuration failed validation.
    InvalidConfig { reason: String },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::MissingNode { node_id } => {
                write!(f, "missing node with id {}", node_id.index())
            }
            TreeError::ActionSelectionFailed { node_id } => {
                write!(f, "failed to select a child of node {}", node_id.index())
            }
            TreeError::NothingToExpand { node_id } => {
                write!(f, "node {} has no untried actions to expand", node_id.index())
            }
            TreeError::InvalidConfig { reason } => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for TreeError {}
