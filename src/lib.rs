//! kgeval
//!
//! Ground-truth generation and retrieval scoring for knowledge-graph
//! benchmarks. A serialized property graph is loaded into an in-memory store,
//! a catalog of fixed multi-hop patterns computes the correct answer set of
//! every scenario, and externally retrieved id sets are scored against them
//! with precision, recall and F1.
//!
//! # Layout
//!
//! - [`graph`]: closed-label property graph, loaded once and read-only after
//! - [`index`]: label + attribute + value lookups built at load time
//! - [`pattern`]: the six pattern shapes and the scenario catalog
//! - [`metrics`]: set scoring and the evaluation report
//! - [`extract`]: retrieved sets from JSON exports or markdown reports
//! - [`config`]: YAML configuration of all of the above
//!
//! ## Example Usage
//!
//! ```rust
//! use kgeval::{EvaluationReport, GraphStore, PatternQueryEngine, RetrievedSets};
//! use kgeval::pattern::default_catalog;
//!
//! let store = GraphStore::from_json_str(r#"{
//!     "nodes": [
//!         {"id": "p1", "label": "Patient", "properties": {"patient_id": "PT-10001"}},
//!         {"id": "p2", "label": "Patient", "properties": {"patient_id": "PT-10002"}},
//!         {"id": "d1", "label": "Doctor",  "properties": {"provider_id": "DOC-101"}}
//!     ],
//!     "edges": [
//!         {"sourceNodeId": "p1", "targetNodeId": "d1", "relationType": "TREATED_BY"},
//!         {"sourceNodeId": "p2", "targetNodeId": "d1", "relationType": "TREATED_BY"}
//!     ]
//! }"#).unwrap();
//!
//! let engine = PatternQueryEngine::new(&store);
//! let peers = engine.shared_provider_peers("PT-10001").unwrap();
//! assert_eq!(peers.into_iter().collect::<Vec<_>>(), vec!["PT-10002"]);
//!
//! // Scenarios whose anchors are missing from this tiny graph are reported
//! // as failures; the rest still get a ground truth.
//! let outcome = engine.run_catalog(&default_catalog());
//! assert!(outcome.truth("Patient Zero").is_some());
//! assert!(!outcome.is_complete());
//!
//! let retrieved: RetrievedSets = serde_json::from_str(
//!     r#"{"Patient Zero": {"KM": ["PT-10002"], "Vector": ["PT-10002", "PT-10003"]}}"#,
//! ).unwrap();
//! let report = EvaluationReport::assemble(&outcome.truths, &retrieved);
//! assert_eq!(report.row("Patient Zero", "KM").unwrap().f1, 1.0);
//! assert_eq!(report.row("Patient Zero", "Vector").unwrap().precision, 0.5);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod extract;
pub mod graph;
pub mod index;
pub mod metrics;
pub mod pattern;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, EvaluationConfig};

pub use extract::{
    ExtractError, ExtractResult, ExtractionRules, JsonRetrievedSets, MarkdownReportParser,
    MarkdownReports, RetrievedSetSource,
};

pub use graph::{
    Edge, EdgeId, GraphError, GraphResult, GraphStatistics, GraphStore, Label, Node, NodeId,
    PropertyMap, PropertyValue, RelationType, SerializedGraph, StoreConfig,
};

pub use metrics::{
    score, CodeSet, EvaluationReport, MethodSummary, RetrievalScore, RetrievedSets, ScoreRecord,
};

pub use pattern::{
    Anchor, CatalogOutcome, GroundTruthSet, Pattern, PatternError, PatternQueryEngine,
    PatternResult, Scenario,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
