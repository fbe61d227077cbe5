//! Retrieved sets exported as JSON
//!
//! ```json
//! { "Patient Zero": { "Vector": ["PT-10002"], "KM": ["PT-10002", "PT-10044"] } }
//! ```

use super::{read_to_string, ExtractResult, RetrievedSetSource};
use crate::metrics::RetrievedSets;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct JsonRetrievedSets {
    path: PathBuf,
}

impl JsonRetrievedSets {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn parse_str(json: &str) -> ExtractResult<RetrievedSets> {
        Ok(serde_json::from_str(json)?)
    }
}

impl RetrievedSetSource for JsonRetrievedSets {
    fn retrieved_sets(&self) -> ExtractResult<RetrievedSets> {
        Self::parse_str(&read_to_string(&self.path)?)
    }
}
