//! Manager for attribute indices
//!
//! Owns one [`AttributeIndex`] per (label, attribute) pair. The store fills
//! it once while loading and only reads it afterwards.

use super::attribute_index::AttributeIndex;
use crate::graph::{Label, Node, NodeId};
use rustc_hash::FxHashMap;

/// Key for identifying an attribute index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeIndexKey {
    pub label: Label,
    pub attribute: String,
}

impl AttributeIndexKey {
    pub fn new(label: Label, attribute: impl Into<String>) -> Self {
        Self {
            label,
            attribute: attribute.into(),
        }
    }
}

/// Manager for all attribute indices
#[derive(Debug, Default)]
pub struct IndexManager {
    indices: FxHashMap<AttributeIndexKey, AttributeIndex>,
}

impl IndexManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every string-valued attribute of `node`
    pub fn index_node(&mut self, node: &Node) {
        for (attribute, value) in &node.properties {
            if let Some(text) = value.as_str() {
                self.index_insert(node.label, attribute, text, node.id);
            }
        }
    }

    pub fn index_insert(&mut self, label: Label, attribute: &str, value: &str, node_id: NodeId) {
        self.indices
            .entry(AttributeIndexKey::new(label, attribute))
            .or_default()
            .insert(value, node_id);
    }

    /// Check if an index exists
    pub fn has_index(&self, label: Label, attribute: &str) -> bool {
        self.indices.contains_key(&AttributeIndexKey::new(label, attribute))
    }

    /// Get index for querying
    pub fn get_index(&self, label: Label, attribute: &str) -> Option<&AttributeIndex> {
        self.indices.get(&AttributeIndexKey::new(label, attribute))
    }

    /// Nodes of `label` whose `attribute` equals `value`, in load order
    pub fn lookup(&self, label: Label, attribute: &str, value: &str) -> &[NodeId] {
        self.get_index(label, attribute)
            .map(|index| index.get(value))
            .unwrap_or_default()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}
