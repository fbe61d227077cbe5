//! Benchmark graph model and store
//!
//! This module implements the labeled property graph the ground-truth
//! patterns run over:
//! - Nodes with exactly one label from a closed set and string-keyed attributes
//! - Directed edges with a relation type from a closed set
//! - A read-only in-memory store with adjacency, relation, label and
//!   attribute indices, plus the patient external-code mapping

pub mod edge;
pub mod format;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::Edge;
pub use format::{IdSequence, SerializedEdge, SerializedGraph, SerializedNode};
pub use node::Node;
pub use property::{PropertyMap, PropertyValue};
pub use store::{
    GraphError, GraphResult, GraphStatistics, GraphStore, StoreConfig, DEFAULT_CODE_ATTRIBUTE,
};
pub use types::{EdgeId, Label, NodeId, RelationType};
