//! In-memory graph storage
//!
//! The store is built in one pass from a [`SerializedGraph`] and is read-only
//! afterwards. Everything the ground-truth patterns need is indexed up front:
//! outgoing adjacency, edges per relation type, nodes per label, string
//! attributes per label, and the bijection between Patient nodes and their
//! external codes.

use super::edge::Edge;
use super::format::SerializedGraph;
use super::node::Node;
use super::types::{EdgeId, Label, NodeId, RelationType};
use crate::index::IndexManager;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Attribute holding a patient's external code in the generator output
pub const DEFAULT_CODE_ATTRIBUTE: &str = "patient_id";

/// Errors that can occur while loading or querying the graph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("malformed graph: {element} #{position} is missing required field `{field}`")]
    MissingField {
        element: &'static str,
        position: usize,
        field: &'static str,
    },

    #[error("malformed graph: edge {edge} references unknown {endpoint} node {node}")]
    DanglingEdge {
        edge: String,
        endpoint: &'static str,
        node: String,
    },

    #[error("malformed graph: node {0} is declared more than once")]
    DuplicateNode(String),

    #[error("malformed graph: node {node} has unknown label {label:?}")]
    UnknownLabel { node: String, label: String },

    #[error("malformed graph: edge {edge} has unknown relation type {relation:?}")]
    UnknownRelation { edge: String, relation: String },

    #[error("malformed graph: patient {node} has no string `{attribute}` attribute")]
    MissingExternalCode { node: String, attribute: String },

    #[error("malformed graph: external code {code} is used by both {first} and {second}")]
    DuplicateExternalCode {
        code: String,
        first: String,
        second: String,
    },

    #[error("malformed graph: {0}")]
    Parse(String),

    #[error("failed to read graph: {0}")]
    Io(String),

    #[error("unknown external code {0}")]
    UnknownCode(String),

    #[error("unknown node {0}")]
    UnknownNodeKey(String),

    #[error("{0} is not a patient node")]
    NotAPatient(NodeId),
}

impl GraphError {
    /// Structural defect in the input graph; evaluation cannot proceed
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            GraphError::MissingField { .. }
                | GraphError::DanglingEdge { .. }
                | GraphError::DuplicateNode(_)
                | GraphError::UnknownLabel { .. }
                | GraphError::UnknownRelation { .. }
                | GraphError::MissingExternalCode { .. }
                | GraphError::DuplicateExternalCode { .. }
                | GraphError::Parse(_)
        )
    }

    /// A code or node lookup outside the known domain
    pub fn is_unknown_identifier(&self) -> bool {
        matches!(
            self,
            GraphError::UnknownCode(_) | GraphError::UnknownNodeKey(_) | GraphError::NotAPatient(_)
        )
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Load-time options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Patient attribute used as the external code
    pub code_attribute: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            code_attribute: DEFAULT_CODE_ATTRIBUTE.to_string(),
        }
    }
}

/// Node and edge counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes_by_label: BTreeMap<Label, usize>,
    pub edges_by_relation: BTreeMap<RelationType, usize>,
}

/// In-memory graph storage
///
/// Uses arenas indexed by the internal ids:
/// - nodes: NodeId -> Node
/// - edges: EdgeId -> Edge
/// - outgoing: NodeId -> Vec<EdgeId> (adjacency list, edge-list order)
/// - relation_index: RelationType -> Vec<EdgeId> (load order)
/// - label_index: Label -> Vec<NodeId> (load order)
///
/// No incoming adjacency is kept: reverse hops scan `relation_index`.
#[derive(Debug)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    outgoing: Vec<Vec<EdgeId>>,

    /// Serialized node id -> internal id
    node_keys: FxHashMap<String, NodeId>,

    label_index: FxHashMap<Label, Vec<NodeId>>,
    relation_index: FxHashMap<RelationType, Vec<EdgeId>>,

    /// Label + attribute + value lookups
    attribute_index: IndexManager,

    code_to_id: FxHashMap<String, NodeId>,
    id_to_code: FxHashMap<NodeId, String>,
}

impl GraphStore {
    /// Build a store using the default [`StoreConfig`]
    pub fn load(graph: &SerializedGraph) -> GraphResult<Self> {
        Self::load_with_config(graph, &StoreConfig::default())
    }

    /// Build a store from a serialized graph
    ///
    /// Fails on the first structural defect; no partially built store is
    /// ever returned.
    pub fn load_with_config(graph: &SerializedGraph, config: &StoreConfig) -> GraphResult<Self> {
        let mut store = GraphStore {
            nodes: Vec::with_capacity(graph.nodes.len()),
            edges: Vec::with_capacity(graph.edges.len()),
            outgoing: Vec::with_capacity(graph.nodes.len()),
            node_keys: FxHashMap::default(),
            label_index: FxHashMap::default(),
            relation_index: FxHashMap::default(),
            attribute_index: IndexManager::new(),
            code_to_id: FxHashMap::default(),
            id_to_code: FxHashMap::default(),
        };

        for (position, raw) in graph.nodes.iter().enumerate() {
            let key = raw.id.as_deref().ok_or(GraphError::MissingField {
                element: "node",
                position,
                field: "id",
            })?;
            let label_name = raw.label.as_deref().ok_or(GraphError::MissingField {
                element: "node",
                position,
                field: "label",
            })?;
            let label: Label = label_name.parse().map_err(|label| GraphError::UnknownLabel {
                node: key.to_string(),
                label,
            })?;

            let node = Node::new(
                NodeId::new(store.nodes.len() as u64),
                key,
                label,
                raw.properties.clone(),
            );
            store.insert_node(node, &config.code_attribute)?;
        }

        for (position, raw) in graph.edges.iter().enumerate() {
            let missing = |field| GraphError::MissingField {
                element: "edge",
                position,
                field,
            };
            let source_key = raw.source_node_id.as_deref().ok_or_else(|| missing("sourceNodeId"))?;
            let target_key = raw.target_node_id.as_deref().ok_or_else(|| missing("targetNodeId"))?;
            let relation_name = raw.relation_type.as_deref().ok_or_else(|| missing("relationType"))?;

            let key = raw
                .id
                .clone()
                .unwrap_or_else(|| format!("edge-{}", position));
            let relation: RelationType =
                relation_name
                    .parse()
                    .map_err(|relation| GraphError::UnknownRelation {
                        edge: key.clone(),
                        relation,
                    })?;
            let source = store.endpoint(&key, "source", source_key)?;
            let target = store.endpoint(&key, "target", target_key)?;

            let edge_id = EdgeId::new(store.edges.len() as u64);
            store.outgoing[source.index()].push(edge_id);
            store.relation_index.entry(relation).or_default().push(edge_id);
            store.edges.push(Edge::new(
                edge_id,
                key,
                source,
                target,
                relation,
                raw.properties.clone(),
            ));
        }

        info!(
            nodes = store.nodes.len(),
            edges = store.edges.len(),
            patients = store.code_to_id.len(),
            "graph loaded"
        );
        Ok(store)
    }

    /// Parse and load a JSON document
    pub fn from_json_str(json: &str) -> GraphResult<Self> {
        Self::load(&SerializedGraph::from_json_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R, config: &StoreConfig) -> GraphResult<Self> {
        Self::load_with_config(&SerializedGraph::from_reader(reader)?, config)
    }

    /// Load a graph JSON file from disk
    pub fn open(path: impl AsRef<Path>, config: &StoreConfig) -> GraphResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading graph file");
        let file = File::open(path).map_err(|e| GraphError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_reader(BufReader::new(file), config)
    }

    fn insert_node(&mut self, node: Node, code_attribute: &str) -> GraphResult<()> {
        if self.node_keys.contains_key(&node.key) {
            return Err(GraphError::DuplicateNode(node.key));
        }

        if node.label == Label::Patient {
            let code = node
                .get_str(code_attribute)
                .ok_or_else(|| GraphError::MissingExternalCode {
                    node: node.key.clone(),
                    attribute: code_attribute.to_string(),
                })?;
            if let Some(existing) = self.code_to_id.get(code) {
                return Err(GraphError::DuplicateExternalCode {
                    code: code.to_string(),
                    first: self.nodes[existing.index()].key.clone(),
                    second: node.key.clone(),
                });
            }
            self.code_to_id.insert(code.to_string(), node.id);
            self.id_to_code.insert(node.id, code.to_string());
        }

        self.node_keys.insert(node.key.clone(), node.id);
        self.label_index.entry(node.label).or_default().push(node.id);
        self.attribute_index.index_node(&node);
        self.outgoing.push(Vec::new());
        self.nodes.push(node);
        Ok(())
    }

    fn endpoint(&self, edge: &str, endpoint: &'static str, key: &str) -> GraphResult<NodeId> {
        self.node_keys
            .get(key)
            .copied()
            .ok_or_else(|| GraphError::DanglingEdge {
                edge: edge.to_string(),
                endpoint,
                node: key.to_string(),
            })
    }

    /// Get a node by internal id
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Outgoing edges of a node in edge-list order
    pub fn outgoing_edges(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.outgoing
            .get(id.index())
            .into_iter()
            .flatten()
            .map(move |edge_id| &self.edges[edge_id.index()])
    }

    /// Outgoing adjacency of a node: (target, relation) in edge-list order.
    /// Empty for nodes without outgoing edges.
    pub fn neighbors(&self, id: NodeId) -> Vec<(NodeId, RelationType)> {
        self.outgoing_edges(id)
            .map(|edge| (edge.target, edge.relation))
            .collect()
    }

    /// Targets of the outgoing edges of one relation type
    pub fn outgoing(&self, id: NodeId, relation: RelationType) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing_edges(id)
            .filter(move |edge| edge.relation == relation)
            .map(|edge| edge.target)
    }

    /// Whether `id` has an outgoing `relation` edge to `target`
    pub fn has_edge_to(&self, id: NodeId, relation: RelationType, target: NodeId) -> bool {
        self.outgoing(id, relation).any(|t| t == target)
    }

    /// All edges of one relation type, in load order
    pub fn edges_by_relation(&self, relation: RelationType) -> Vec<&Edge> {
        self.relation_index
            .get(&relation)
            .map(|ids| ids.iter().map(|id| &self.edges[id.index()]).collect())
            .unwrap_or_default()
    }

    /// All nodes with a label, in load order
    pub fn nodes_by_label(&self, label: Label) -> Vec<&Node> {
        self.label_index
            .get(&label)
            .map(|ids| ids.iter().map(|id| &self.nodes[id.index()]).collect())
            .unwrap_or_default()
    }

    /// Patient nodes with their external codes, in load order
    pub fn patients(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.label_index
            .get(&Label::Patient)
            .into_iter()
            .flatten()
            .map(move |id| (self.id_to_code[id].as_str(), *id))
    }

    /// Resolve an external code to its Patient node
    pub fn code_to_id(&self, code: &str) -> GraphResult<NodeId> {
        self.code_to_id
            .get(code)
            .copied()
            .ok_or_else(|| GraphError::UnknownCode(code.to_string()))
    }

    /// External code of a Patient node
    pub fn id_to_code(&self, id: NodeId) -> GraphResult<&str> {
        self.code_of(id).ok_or(GraphError::NotAPatient(id))
    }

    /// External code of a node, if it has one
    pub fn code_of(&self, id: NodeId) -> Option<&str> {
        self.id_to_code.get(&id).map(String::as_str)
    }

    /// Resolve a node id as written in the serialized graph
    pub fn resolve_key(&self, key: &str) -> GraphResult<NodeId> {
        self.node_keys
            .get(key)
            .copied()
            .ok_or_else(|| GraphError::UnknownNodeKey(key.to_string()))
    }

    /// Nodes of `label` whose string `attribute` equals `value`, in load order
    pub fn nodes_by_attribute(&self, label: Label, attribute: &str, value: &str) -> &[NodeId] {
        self.attribute_index.lookup(label, attribute, value)
    }

    /// First node of `label` whose string `attribute` equals `value`
    pub fn find_by_attribute(&self, label: Label, attribute: &str, value: &str) -> Option<NodeId> {
        self.nodes_by_attribute(label, attribute, value).first().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn statistics(&self) -> GraphStatistics {
        GraphStatistics {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            nodes_by_label: self
                .label_index
                .iter()
                .map(|(label, ids)| (*label, ids.len()))
                .collect(),
            edges_by_relation: self
                .relation_index
                .iter()
                .map(|(relation, ids)| (*relation, ids.len()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PropertyMap;

    fn props(pairs: &[(&str, &str)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), (*v).into()))
            .collect()
    }

    fn small_graph() -> SerializedGraph {
        let mut graph = SerializedGraph::new();
        graph
            .add_node("p1", Label::Patient, props(&[("patient_id", "PT-10001")]))
            .add_node("p2", Label::Patient, props(&[("patient_id", "PT-10002")]))
            .add_node("d1", Label::Doctor, props(&[("provider_id", "DOC-100")]))
            .add_node("c1", Label::Condition, props(&[("name", "Bronchial Asthma")]))
            .add_node("m1", Label::Medication, props(&[("name", "Propranolol")]))
            .add_edge("e1", "p1", "d1", RelationType::TreatedBy)
            .add_edge("e2", "p1", "c1", RelationType::HasCondition)
            .add_edge("e3", "p1", "m1", RelationType::PrescribedMedication)
            .add_edge("e4", "m1", "c1", RelationType::ContraindicatedFor)
            .add_edge("e5", "p2", "d1", RelationType::TreatedBy);
        graph
    }

    #[test]
    fn test_load_counts() {
        let store = GraphStore::load(&small_graph()).unwrap();
        assert_eq!(store.node_count(), 5);
        assert_eq!(store.edge_count(), 5);

        let stats = store.statistics();
        assert_eq!(stats.nodes_by_label[&Label::Patient], 2);
        assert_eq!(stats.edges_by_relation[&RelationType::TreatedBy], 2);
        assert_eq!(stats.nodes_by_label[&Label::Doctor], 1);
    }

    #[test]
    fn test_neighbors_in_edge_list_order() {
        let store = GraphStore::load(&small_graph()).unwrap();
        let p1 = store.code_to_id("PT-10001").unwrap();
        let d1 = store.resolve_key("d1").unwrap();
        let c1 = store.resolve_key("c1").unwrap();
        let m1 = store.resolve_key("m1").unwrap();

        assert_eq!(
            store.neighbors(p1),
            vec![
                (d1, RelationType::TreatedBy),
                (c1, RelationType::HasCondition),
                (m1, RelationType::PrescribedMedication),
            ]
        );
        // Doctors have no outgoing edges
        assert!(store.neighbors(d1).is_empty());
        // Direction is not symmetric
        assert!(store.neighbors(c1).is_empty());
        assert_eq!(store.neighbors(m1), vec![(c1, RelationType::ContraindicatedFor)]);
    }

    #[test]
    fn test_edges_by_relation_in_load_order() {
        let store = GraphStore::load(&small_graph()).unwrap();
        let treated: Vec<&str> = store
            .edges_by_relation(RelationType::TreatedBy)
            .iter()
            .map(|e| e.key.as_str())
            .collect();
        assert_eq!(treated, vec!["e1", "e5"]);

        let store = GraphStore::load(&SerializedGraph::new()).unwrap();
        assert!(store.edges_by_relation(RelationType::HasCondition).is_empty());
    }

    #[test]
    fn test_code_mapping() {
        let store = GraphStore::load(&small_graph()).unwrap();
        let p2 = store.code_to_id("PT-10002").unwrap();
        assert_eq!(store.id_to_code(p2).unwrap(), "PT-10002");

        assert_eq!(
            store.code_to_id("PT-99999"),
            Err(GraphError::UnknownCode("PT-99999".to_string()))
        );
        let d1 = store.resolve_key("d1").unwrap();
        assert_eq!(store.id_to_code(d1), Err(GraphError::NotAPatient(d1)));
        assert!(store.id_to_code(d1).unwrap_err().is_unknown_identifier());

        let codes: Vec<&str> = store.patients().map(|(code, _)| code).collect();
        assert_eq!(codes, vec!["PT-10001", "PT-10002"]);
    }

    #[test]
    fn test_find_by_attribute() {
        let store = GraphStore::load(&small_graph()).unwrap();
        let c1 = store.resolve_key("c1").unwrap();
        assert_eq!(
            store.find_by_attribute(Label::Condition, "name", "Bronchial Asthma"),
            Some(c1)
        );
        assert_eq!(
            store.find_by_attribute(Label::Medication, "name", "Bronchial Asthma"),
            None
        );
        assert_eq!(store.find_by_attribute(Label::Condition, "name", "Asthma"), None);
    }

    #[test]
    fn test_dangling_target_fails() {
        let mut graph = small_graph();
        graph.add_edge("e9", "p2", "ghost", RelationType::HasCondition);

        let err = GraphStore::load(&graph).unwrap_err();
        assert_eq!(
            err,
            GraphError::DanglingEdge {
                edge: "e9".to_string(),
                endpoint: "target",
                node: "ghost".to_string(),
            }
        );
        assert!(err.is_malformed());
    }

    #[test]
    fn test_dangling_source_fails() {
        let mut graph = small_graph();
        graph.add_edge("e9", "ghost", "d1", RelationType::TreatedBy);
        assert!(matches!(
            GraphStore::load(&graph),
            Err(GraphError::DanglingEdge { endpoint: "source", .. })
        ));
    }

    #[test]
    fn test_missing_required_fields() {
        let mut graph = small_graph();
        graph.nodes[1].label = None;
        assert_eq!(
            GraphStore::load(&graph).unwrap_err(),
            GraphError::MissingField { element: "node", position: 1, field: "label" }
        );

        let mut graph = small_graph();
        graph.edges[2].relation_type = None;
        assert_eq!(
            GraphStore::load(&graph).unwrap_err(),
            GraphError::MissingField { element: "edge", position: 2, field: "relationType" }
        );

        let mut graph = small_graph();
        graph.edges[0].id = None;
        let store = GraphStore::load(&graph).unwrap();
        assert_eq!(store.edges_by_relation(RelationType::TreatedBy)[0].key, "edge-0");
    }

    #[test]
    fn test_closed_label_and_relation_sets() {
        let mut graph = small_graph();
        graph.nodes[2].label = Some("Nurse".to_string());
        assert!(matches!(
            GraphStore::load(&graph),
            Err(GraphError::UnknownLabel { .. })
        ));

        let mut graph = small_graph();
        graph.edges[0].relation_type = Some("KNOWS".to_string());
        assert!(matches!(
            GraphStore::load(&graph),
            Err(GraphError::UnknownRelation { .. })
        ));
    }

    #[test]
    fn test_external_code_invariants() {
        let mut graph = small_graph();
        graph.add_node("p3", Label::Patient, props(&[("patient_id", "PT-10001")]));
        assert!(matches!(
            GraphStore::load(&graph),
            Err(GraphError::DuplicateExternalCode { .. })
        ));

        let mut graph = small_graph();
        graph.add_node("p3", Label::Patient, PropertyMap::new());
        assert!(matches!(
            GraphStore::load(&graph),
            Err(GraphError::MissingExternalCode { .. })
        ));

        let mut graph = small_graph();
        graph.add_node("p1", Label::Doctor, PropertyMap::new());
        assert_eq!(
            GraphStore::load(&graph).unwrap_err(),
            GraphError::DuplicateNode("p1".to_string())
        );
    }

    #[test]
    fn test_custom_code_attribute() {
        let mut graph = SerializedGraph::new();
        graph.add_node("p1", Label::Patient, props(&[("mrn", "MRN-7")]));
        let config = StoreConfig {
            code_attribute: "mrn".to_string(),
        };
        let store = GraphStore::load_with_config(&graph, &config).unwrap();
        assert!(store.code_to_id("MRN-7").is_ok());
    }

    #[test]
    fn test_open_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        std::fs::write(&path, small_graph().to_json_string().unwrap()).unwrap();

        let store = GraphStore::open(&path, &StoreConfig::default()).unwrap();
        assert_eq!(store.node_count(), 5);

        let missing = GraphStore::open(dir.path().join("nope.json"), &StoreConfig::default())
            .unwrap_err();
        assert!(matches!(missing, GraphError::Io(_)));
        // Unreadable input is neither a broken graph nor an unknown lookup
        assert!(!missing.is_malformed());
        assert!(!missing.is_unknown_identifier());

        std::fs::write(&path, "{\"nodes\": [").unwrap();
        let truncated = GraphStore::open(&path, &StoreConfig::default()).unwrap_err();
        assert!(matches!(truncated, GraphError::Parse(_)));
        assert!(truncated.is_malformed());
    }
}
