//! Directed, typed edges

use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, NodeId, RelationType};
use serde::Serialize;

/// A directed edge `source -[relation]-> target`
#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub id: EdgeId,
    /// Identifier used by the serialized graph, or `edge-<position>`
    pub key: String,
    pub source: NodeId,
    pub target: NodeId,
    pub relation: RelationType,
    pub properties: PropertyMap,
}

impl Edge {
    pub fn new(
        id: EdgeId,
        key: impl Into<String>,
        source: NodeId,
        target: NodeId,
        relation: RelationType,
        properties: PropertyMap,
    ) -> Self {
        Edge {
            id,
            key: key.into(),
            source,
            target,
            relation,
            properties,
        }
    }

    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn ends_at(&self, node: NodeId) -> bool {
        self.target == node
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Edge {}
