//! Core type definitions for the benchmark graph

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl $name {
            pub fn new(id: u64) -> Self {
                $name(id)
            }

            pub fn as_u64(&self) -> u64 {
                self.0
            }

            /// Slot in the store's arena
            pub(crate) fn index(&self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

arena_id!(
    /// Internal node identifier, dense in load order
    NodeId
);
arena_id!(
    /// Internal edge identifier, dense in load order
    EdgeId
);

/// Node label. The benchmark graph only knows these four entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum Label {
    Patient,
    Doctor,
    Condition,
    Medication,
}

impl Label {
    pub const ALL: [Label; 4] = [
        Label::Patient,
        Label::Doctor,
        Label::Condition,
        Label::Medication,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Patient => "Patient",
            Label::Doctor => "Doctor",
            Label::Condition => "Condition",
            Label::Medication => "Medication",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Relation type of a directed edge.
///
/// Direction matters: `PrescribedMedication` points Patient -> Medication
/// while `ContraindicatedFor` points Medication -> Condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    HasCondition,
    PrescribedMedication,
    TreatedBy,
    ContraindicatedFor,
}

impl RelationType {
    pub const ALL: [RelationType; 4] = [
        RelationType::HasCondition,
        RelationType::PrescribedMedication,
        RelationType::TreatedBy,
        RelationType::ContraindicatedFor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::HasCondition => "HAS_CONDITION",
            RelationType::PrescribedMedication => "PRESCRIBED_MEDICATION",
            RelationType::TreatedBy => "TREATED_BY",
            RelationType::ContraindicatedFor => "CONTRAINDICATED_FOR",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationType::ALL
            .into_iter()
            .find(|relation| relation.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_ids() {
        let node = NodeId::new(42);
        assert_eq!(node.as_u64(), 42);
        assert_eq!(node.index(), 42);
        assert_eq!(format!("{}", node), "NodeId(42)");
        assert_eq!(format!("{}", EdgeId::new(99)), "EdgeId(99)");
        assert!(NodeId::new(1) < NodeId::new(2));
    }

    #[test]
    fn test_label_parse() {
        assert_eq!("Patient".parse::<Label>(), Ok(Label::Patient));
        assert_eq!("Medication".parse::<Label>(), Ok(Label::Medication));
        assert_eq!("patient".parse::<Label>(), Err("patient".to_string()));
        assert_eq!(format!("{}", Label::Doctor), "Doctor");
    }

    #[test]
    fn test_relation_type_parse() {
        assert_eq!("TREATED_BY".parse::<RelationType>(), Ok(RelationType::TreatedBy));
        assert_eq!(
            "CONTRAINDICATED_FOR".parse::<RelationType>(),
            Ok(RelationType::ContraindicatedFor)
        );
        assert!("KNOWS".parse::<RelationType>().is_err());
        assert_eq!(format!("{}", RelationType::HasCondition), "HAS_CONDITION");
    }

    #[test]
    fn test_relation_type_serde_names() {
        let json = serde_json::to_string(&RelationType::PrescribedMedication).unwrap();
        assert_eq!(json, "\"PRESCRIBED_MEDICATION\"");
    }
}
