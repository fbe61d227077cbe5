//! Ground-truth pattern catalog
//!
//! Each pattern is a fixed multi-hop traversal over the [`GraphStore`]
//! (plus optional attribute filters) whose answer is the set of patient
//! external codes a perfect retriever would return for a scenario.
//!
//! [`GraphStore`]: crate::graph::GraphStore

pub mod catalog;
pub mod engine;

pub use catalog::{default_catalog, CatalogOutcome, Pattern, Scenario};
pub use engine::PatternQueryEngine;

use crate::graph::{GraphError, Label};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Attribute used to resolve [`Anchor::Name`]
pub const NAME_ATTRIBUTE: &str = "name";

/// Correct answer for one scenario: a set of external codes
pub type GroundTruthSet = BTreeSet<String>;

/// Errors raised while evaluating a single pattern
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("no {label} node has {attribute} = {value:?}")]
    AnchorNotFound {
        label: Label,
        attribute: String,
        value: String,
    },
}

pub type PatternResult<T> = Result<T, PatternError>;

/// Literal starting point for a pattern
///
/// `Id` is a node id as written in the serialized graph; `Name` is resolved
/// through the attribute index on the `name` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Id(String),
    Name(String),
}

impl Anchor {
    pub fn id(key: impl Into<String>) -> Self {
        Anchor::Id(key.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        Anchor::Name(name.into())
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Id(key) => write!(f, "id {}", key),
            Anchor::Name(name) => write!(f, "name {:?}", name),
        }
    }
}
