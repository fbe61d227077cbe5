//! Retrieval scoring and the evaluation report

pub mod report;
pub mod scorer;

pub use report::{EvaluationReport, MethodSummary, ScoreRecord};
pub use scorer::{score, RetrievalScore};

use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Externally visible ids retrieved by one method
pub type CodeSet = BTreeSet<String>;

/// Scenario -> method -> retrieved codes
pub type RetrievedSets = IndexMap<String, IndexMap<String, CodeSet>>;
