//! Value index for one attribute of one label
//!
//! Backs the name lookups that anchor ground-truth patterns
//! ("the Condition whose `name` is `Bronchial Asthma`").

use crate::graph::NodeId;
use rustc_hash::FxHashMap;

/// Index for a specific attribute on a specific label
#[derive(Debug, Clone, Default)]
pub struct AttributeIndex {
    /// Value -> node ids, in load order
    index: FxHashMap<String, Vec<NodeId>>,
}

impl AttributeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: impl Into<String>, node_id: NodeId) {
        let nodes = self.index.entry(value.into()).or_default();
        if !nodes.contains(&node_id) {
            nodes.push(node_id);
        }
    }

    /// All nodes holding `value`, in the order they were loaded
    pub fn get(&self, value: &str) -> &[NodeId] {
        self.index.get(value).map(Vec::as_slice).unwrap_or_default()
    }

    /// First node holding `value`
    pub fn first(&self, value: &str) -> Option<NodeId> {
        self.get(value).first().copied()
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
