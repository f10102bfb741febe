mod arena;
pub mod budget;
pub mod domain;
pub mod error;
pub mod ids;
pub mod mcts;
pub mod node;
pub mod rollout;
pub mod search_tree;
pub mod snapshot;
pub mod stats;

#[cfg(test)]
mod tests;
