//! Attribute values for graph nodes and edges
//!
//! Values deserialize straight from the JSON graph format. Only strings take
//! part in indexing and pattern filters; the other variants are carried so
//! that generator output loads without loss.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<PropertyValue>),
    Object(PropertyMap),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to floats; JSON does not distinguish `12` from `12.0`
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

/// Attribute map for nodes and edges
pub type PropertyMap = HashMap<String, PropertyValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_generator_properties() {
        let props: PropertyMap = serde_json::from_str(
            r#"{
                "patient_id": "PT-10001",
                "smoking_status": "Current Smoker ( > 1 pack/day)",
                "years_experience": 12,
                "bmi": 24.5,
                "board_certified": true,
                "notes": null
            }"#,
        )
        .unwrap();

        assert_eq!(props["patient_id"].as_str(), Some("PT-10001"));
        assert_eq!(props["years_experience"].as_integer(), Some(12));
        assert_eq!(props["years_experience"].as_float(), Some(12.0));
        assert_eq!(props["bmi"].as_float(), Some(24.5));
        assert_eq!(props["board_certified"], PropertyValue::Boolean(true));
        assert!(props["notes"].is_null());
        // Numbers are never treated as text
        assert_eq!(props["years_experience"].as_str(), None);
    }

    #[test]
    fn test_nested_properties() {
        let value: PropertyValue =
            serde_json::from_str(r#"{"dosage": ["5mg", "10mg"], "daily": 1}"#).unwrap();
        let PropertyValue::Object(map) = value else {
            panic!("expected an object, got {:?}", value);
        };
        assert!(matches!(&map["dosage"], PropertyValue::List(items) if items.len() == 2));
        assert_eq!(map["daily"].as_integer(), Some(1));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(PropertyValue::from("Asthma").as_str(), Some("Asthma"));
        assert_eq!(PropertyValue::from(String::from("DOC-101")).as_str(), Some("DOC-101"));
        assert_eq!(PropertyValue::from(7i64).as_integer(), Some(7));
    }
}
