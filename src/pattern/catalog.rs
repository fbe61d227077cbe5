//! Scenario catalog
//!
//! A scenario names one pattern instance. The catalog is plain data so it can
//! live in a YAML config:
//!
//! ```yaml
//! - name: Patient Zero
//!   pattern: shared_provider_peers
//!   patient: PT-10001
//! - name: Smokers with Asthma
//!   pattern: status_with_condition
//!   condition: { name: Bronchial Asthma }
//!   status: Current Smoker
//! ```

use super::{Anchor, GroundTruthSet, PatternError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Patient attribute matched by [`Pattern::StatusWithCondition`] by default
pub const DEFAULT_STATUS_ATTRIBUTE: &str = "smoking_status";

fn default_status_attribute() -> String {
    DEFAULT_STATUS_ATTRIBUTE.to_string()
}

/// The fixed set of pattern shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum Pattern {
    /// Patients sharing a doctor with the anchor patient, anchor excluded
    SharedProviderPeers { patient: String },

    /// Patients prescribed a medication contraindicated for one of their
    /// own conditions
    Contraindications,

    /// Patients whose status attribute contains `status` and who have the
    /// anchor condition
    StatusWithCondition {
        condition: Anchor,
        #[serde(default = "default_status_attribute")]
        attribute: String,
        status: String,
    },

    /// Patients with the anchor condition who are prescribed the anchor
    /// medication
    ConditionAndMedication { condition: Anchor, medication: Anchor },

    /// Patients prescribed any medication contraindicated for the anchor
    /// condition
    IndirectRisk { condition: Anchor },

    /// All patients of any doctor treating a patient with the anchor
    /// condition
    SharedProviderRisk { condition: Anchor },
}

impl Pattern {
    pub fn kind(&self) -> &'static str {
        match self {
            Pattern::SharedProviderPeers { .. } => "shared_provider_peers",
            Pattern::Contraindications => "contraindications",
            Pattern::StatusWithCondition { .. } => "status_with_condition",
            Pattern::ConditionAndMedication { .. } => "condition_and_medication",
            Pattern::IndirectRisk { .. } => "indirect_risk",
            Pattern::SharedProviderRisk { .. } => "shared_provider_risk",
        }
    }
}

/// A named pattern instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(flatten)]
    pub pattern: Pattern,
}

impl Scenario {
    pub fn new(name: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            name: name.into(),
            pattern,
        }
    }
}

/// Result of running a whole catalog
///
/// Failures are kept per scenario; one failing scenario never removes
/// another's ground truth.
#[derive(Debug, Clone, Default)]
pub struct CatalogOutcome {
    pub truths: IndexMap<String, GroundTruthSet>,
    pub failures: IndexMap<String, PatternError>,
}

impl CatalogOutcome {
    pub fn truth(&self, scenario: &str) -> Option<&GroundTruthSet> {
        self.truths.get(scenario)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Node id of "Rheumatoid Arthritis" in the published medical benchmark data
pub const RHEUMATOID_ARTHRITIS_ID: &str = "e5581355-937b-40db-ab3f-034cd9e0ebfa";
/// Node id of "Albuterol" in the published medical benchmark data
pub const ALBUTEROL_ID: &str = "27380cec-996c-4233-b14d-c06d72a9392a";

/// Scenarios of the medical knowledge-model benchmark
pub fn default_catalog() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "Patient Zero",
            Pattern::SharedProviderPeers {
                patient: "PT-10001".to_string(),
            },
        ),
        Scenario::new("Contraindications", Pattern::Contraindications),
        Scenario::new(
            "Smokers with Asthma",
            Pattern::StatusWithCondition {
                condition: Anchor::name("Bronchial Asthma"),
                attribute: default_status_attribute(),
                status: "Current Smoker".to_string(),
            },
        ),
        Scenario::new(
            "Intersection",
            Pattern::ConditionAndMedication {
                condition: Anchor::id(RHEUMATOID_ARTHRITIS_ID),
                medication: Anchor::id(ALBUTEROL_ID),
            },
        ),
        Scenario::new(
            "Root Cause Analysis",
            Pattern::ConditionAndMedication {
                condition: Anchor::name("Type 2 Diabetes Mellitus"),
                medication: Anchor::name("Prednisone"),
            },
        ),
        Scenario::new(
            "Indirect Contraindication Risk",
            Pattern::IndirectRisk {
                condition: Anchor::name("Congestive Heart Failure"),
            },
        ),
        Scenario::new(
            "Shared Doctor Risk",
            Pattern::SharedProviderRisk {
                condition: Anchor::id(RHEUMATOID_ARTHRITIS_ID),
            },
        ),
    ]
}
