//! The proper-class tag and cardinality values.
//!
//! [`ProperClass`] discriminates the structural roles a record can play.
//! Its declaration order is also the persistence order: every kind only
//! depends on kinds that precede it (see [`ProperClass::STRUCTURAL_ORDER`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// The enumerated kind tag of a structural record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProperClass {
    Node,
    Connector,
    Visibility,
    BoundaryReference,
    Command,
    Query,
}

impl ProperClass {
    /// Fixed order in which structural kinds are written.
    ///
    /// Nodes are referenced by connectors (`from_node`/`to_node`); connector
    /// base rows are referenced by typed-connector extension rows; commands
    /// and queries are leaves.
    pub const STRUCTURAL_ORDER: [ProperClass; 6] = [
        ProperClass::Node,
        ProperClass::Connector,
        ProperClass::Visibility,
        ProperClass::BoundaryReference,
        ProperClass::Command,
        ProperClass::Query,
    ];

    /// Proper classes a connector row may carry.
    pub const CONNECTOR_CLASSES: [ProperClass; 3] = [
        ProperClass::Connector,
        ProperClass::Visibility,
        ProperClass::BoundaryReference,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProperClass::Node => "Node",
            ProperClass::Connector => "Connector",
            ProperClass::Visibility => "Visibility",
            ProperClass::BoundaryReference => "BoundaryReference",
            ProperClass::Command => "Command",
            ProperClass::Query => "Query",
        }
    }

    /// Returns `true` if a connector row may carry this proper class.
    pub fn is_connector_class(self) -> bool {
        Self::CONNECTOR_CLASSES.contains(&self)
    }
}

impl fmt::Display for ProperClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProperClass {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Node" => Ok(ProperClass::Node),
            "Connector" => Ok(ProperClass::Connector),
            "Visibility" => Ok(ProperClass::Visibility),
            "BoundaryReference" => Ok(ProperClass::BoundaryReference),
            "Command" => Ok(ProperClass::Command),
            "Query" => Ok(ProperClass::Query),
            other => Err(ModelError::UnknownProperClass(other.to_string())),
        }
    }
}

/// Maximum number of instances of a node permitted in its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    Bounded(u32),
    #[default]
    Unbounded,
}

impl Cardinality {
    /// Column representation: `NULL` stands for unbounded.
    pub fn to_column(self) -> Option<u32> {
        match self {
            Cardinality::Bounded(n) => Some(n),
            Cardinality::Unbounded => None,
        }
    }

    pub fn from_column(value: Option<u32>) -> Self {
        value.map_or(Cardinality::Unbounded, Cardinality::Bounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_order_is_declaration_order() {
        let mut sorted = ProperClass::STRUCTURAL_ORDER;
        sorted.sort();
        assert_eq!(sorted, ProperClass::STRUCTURAL_ORDER);
    }

    #[test]
    fn parse_round_trips_every_class() {
        for class in ProperClass::STRUCTURAL_ORDER {
            assert_eq!(class.as_str().parse::<ProperClass>().unwrap(), class);
        }
    }

    #[test]
    fn unknown_class_is_rejected() {
        assert_eq!(
            "Vertex".parse::<ProperClass>(),
            Err(ModelError::UnknownProperClass("Vertex".into()))
        );
    }

    #[test]
    fn connector_classes() {
        assert!(ProperClass::Visibility.is_connector_class());
        assert!(ProperClass::BoundaryReference.is_connector_class());
        assert!(!ProperClass::Node.is_connector_class());
        assert!(!ProperClass::Query.is_connector_class());
    }

    #[test]
    fn cardinality_column_mapping() {
        assert_eq!(Cardinality::Bounded(3).to_column(), Some(3));
        assert_eq!(Cardinality::Unbounded.to_column(), None);
        assert_eq!(Cardinality::from_column(None), Cardinality::Unbounded);
        assert_eq!(Cardinality::from_column(Some(1)), Cardinality::Bounded(1));
    }
}
