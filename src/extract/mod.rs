//! Retrieved-set sources
//!
//! The scorer only ever sees [`RetrievedSets`]. Where they come from (a JSON
//! export, free-text benchmark reports) stays behind [`RetrievedSetSource`].

pub mod json;
pub mod markdown;

pub use json::JsonRetrievedSets;
pub use markdown::{ExtractionRules, MarkdownReportParser, MarkdownReports, MethodRule, SectionRule};

use crate::metrics::RetrievedSets;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default lexical shape of a patient code: literal prefix plus five digits
pub const DEFAULT_CODE_PATTERN: &str = r"PT-\d{5}";

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid retrieved-set JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type ExtractResult<T> = Result<T, ExtractError>;

/// Producer of scenario -> method -> retrieved-code sets
pub trait RetrievedSetSource {
    fn retrieved_sets(&self) -> ExtractResult<RetrievedSets>;
}

pub(crate) fn read_to_string(path: &Path) -> ExtractResult<String> {
    std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge `other` into `into`; a scenario present in both is replaced
pub fn merge(into: &mut RetrievedSets, other: RetrievedSets) {
    for (scenario, methods) in other {
        into.insert(scenario, methods);
    }
}
