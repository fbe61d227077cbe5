//! Attribute indexing module
//!
//! Label + attribute + value lookups built once when the graph is loaded.

pub mod attribute_index;
pub mod manager;

pub use attribute_index::AttributeIndex;
pub use manager::{AttributeIndexKey, IndexManager};
