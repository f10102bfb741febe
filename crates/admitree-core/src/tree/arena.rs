use std::slice::Iter;

use crate::tree::ids::NodeId;

/// Holds all nodes of one search and allows for fast allocation.
/// Nodes are never removed, the whole arena is dropped when the search ends.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    storage: Vec<T>,
}

impl<T> Arena<T> {
    /// Create a new empty storage
    pub fn new() -> Self {
        Arena {
            storage: Vec::new(),
        }
    }

    /// Allocate a new item to the storage and return the associated NodeId
    pub fn allocate(&mut self, item: T) -> NodeId {
        let id = NodeId::from(self.storage.len());
        self.storage.push(item);
        id
    }

    /// Retrieve an associated item from the Arena
    pub fn get(&self, node_id: NodeId) -> Option<&T> {
        self.storage.get(node_id.index())
    }

    /// Retrieve an associated item from the Arena as a mutable borrow
    pub fn get_mut(&mut self, node_id: NodeId) -> Option<&mut T> {
        self.storage.get_mut(node_id.index())
    }

    /// Check the length of the Arena
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Iteration helper for the Arena
    pub fn iter(&self) -> Iter<'_, T> {
        self.storage.iter()
    }
}
