//! Graph nodes

use super::property::{PropertyMap, PropertyValue};
use super::types::{Label, NodeId};
use serde::Serialize;

/// A node of the benchmark graph
///
/// Created by [`GraphStore::load`](super::GraphStore::load) and never changed
/// afterwards. `key` is the id the node had in the serialized graph (usually
/// a UUID); `id` is its arena slot.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub key: String,
    pub label: Label,
    pub properties: PropertyMap,
}

impl Node {
    pub fn new(id: NodeId, key: impl Into<String>, label: Label, properties: PropertyMap) -> Self {
        Node {
            id,
            key: key.into(),
            label,
            properties,
        }
    }

    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Attribute value if it is a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get_property(key).and_then(PropertyValue::as_str)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
