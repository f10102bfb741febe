use std::fmt;

use serde::Serialize;

use crate::tree::search_tree::Tree;

const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct TreeSnapshot {
    pub schema_version: u32,
    pub root_node_id: usize,
    pub node_count: usize,
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub node_id: usize,
    pub depth: u64,
    pub parent_node_id: Option<usize>,
    pub action: Option<String>,
    pub cost: f64,
    pub visits: u64,
    pub total_reward: f64,
    pub mean_reward: f64,
    pub is_terminal: bool,
    pub untried_actions: usize,
    pub children: Vec<usize>,
}

impl TreeSnapshot {
    /// Serialize the snapshot as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<S, A> Tree<S, A>
where
    S: Clone,
    A: Clone + PartialEq + fmt::Display,
{
    /// Capture the statistics of every node for reporting.
    pub fn snapshot(&self) -> TreeSnapshot {
        let nodes: Vec<NodeSnapshot> = self
            .nodes()
            .enumerate()
            .map(|(node_id, node)| NodeSnapshot {
                node_id,
                depth: node.depth(),
                parent_node_id: node.parent().map(|parent| parent.index()),
                action: node.action().map(ToString::to_string),
                cost: node.cost(),
                visits: node.visits(),
                total_reward: node.total_reward(),
                mean_reward: node.stats().mean(),
                is_terminal: node.is_terminal(),
                untried_actions: node.untried_actions().len(),
                children: node.children().iter().map(|child| child.index()).collect(),
            })
            .collect();

        TreeSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            root_node_id: self.root_id().index(),
            node_count: nodes.len(),
            nodes,
        }
    }
}
