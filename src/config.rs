//! Evaluation configuration
//!
//! Everything that is specific to one benchmark lives here: the patient code
//! attribute, the scenario catalog and the report extraction rules. The
//! default is the medical knowledge-model benchmark.
//!
//! ```yaml
//! store:
//!   code_attribute: patient_id
//! scenarios:
//!   - name: Patient Zero
//!     pattern: shared_provider_peers
//!     patient: PT-10001
//! extraction:
//!   code_pattern: 'PT-\d{5}'
//! ```
//!
//! Omitted sections fall back to their defaults.

use crate::extract::ExtractionRules;
use crate::graph::StoreConfig;
use crate::pattern::{default_catalog, Scenario};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub store: StoreConfig,
    pub scenarios: Vec<Scenario>,
    pub extraction: ExtractionRules,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            scenarios: default_catalog(),
            extraction: ExtractionRules::default(),
        }
    }
}

impl EvaluationConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml)?;
        debug!(
            path = %path.display(),
            scenarios = config.scenarios.len(),
            "loaded evaluation config"
        );
        Ok(config)
    }

    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }
}
