//! Serialized graph format
//!
//! The benchmark data generator writes a JSON document shaped like
//!
//! ```json
//! {
//!   "nodes": [{ "id": "...", "label": "Patient", "properties": { ... } }],
//!   "edges": [{ "id": "...", "sourceNodeId": "...", "targetNodeId": "...",
//!               "relationType": "TREATED_BY", "properties": { ... } }]
//! }
//! ```
//!
//! Required fields are kept optional here so that a missing field surfaces as
//! a [`GraphError::MissingField`] during load instead of an opaque serde error.
//! Unknown top-level members (the generator also emits `chunks`) are ignored.

use super::property::PropertyMap;
use super::store::{GraphError, GraphResult};
use super::types::{Label, RelationType};
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerializedGraph {
    pub nodes: Vec<SerializedNode>,
    pub edges: Vec<SerializedEdge>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerializedNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub properties: PropertyMap,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_type: Option<String>,
    #[serde(default)]
    pub properties: PropertyMap,
}

impl SerializedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> GraphResult<Self> {
        serde_json::from_str(json).map_err(|e| GraphError::Parse(e.to_string()))
    }

    pub fn from_reader<R: Read>(reader: R) -> GraphResult<Self> {
        serde_json::from_reader(reader).map_err(|e| GraphError::Parse(e.to_string()))
    }

    pub fn to_json_string(&self) -> GraphResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| GraphError::Parse(e.to_string()))
    }

    /// Append a node
    pub fn add_node(
        &mut self,
        id: impl Into<String>,
        label: Label,
        properties: PropertyMap,
    ) -> &mut Self {
        self.nodes.push(SerializedNode {
            id: Some(id.into()),
            label: Some(label.as_str().to_string()),
            properties,
        });
        self
    }

    /// Append an edge without attributes
    pub fn add_edge(
        &mut self,
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        relation: RelationType,
    ) -> &mut Self {
        self.edges.push(SerializedEdge {
            id: Some(id.into()),
            source_node_id: Some(source.into()),
            target_node_id: Some(target.into()),
            relation_type: Some(relation.as_str().to_string()),
            properties: PropertyMap::new(),
        });
        self
    }
}

/// Sequential identifier generator for building graphs by hand
///
/// Passed by `&mut` to whatever builds nodes and edges; there is no shared
/// counter anywhere in the crate.
#[derive(Debug, Clone)]
pub struct IdSequence {
    prefix: String,
    next: u64,
}

impl IdSequence {
    pub fn new(prefix: impl Into<String>, start: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: start,
        }
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }

    /// Value the next call to [`next_id`](Self::next_id) will use
    pub fn peek(&self) -> u64 {
        self.next
    }
}
