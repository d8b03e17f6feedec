//! Arrow-like relations between nodes and their typed specialisation.
//!
//! A [`Connector`] relates two nodes. Its proper class is checked when the
//! value is built, so an invalid connector never reaches a store. A
//! [`TypedConnector`] is a one-to-one extension row keyed by its base
//! connector's urr, carrying cardinality, navigability, and containment
//! values for both ends.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::foreign_key::ForeignKey;
use crate::id::{Urr, Uuid};
use crate::proper_class::ProperClass;
use crate::record::{EntityKind, Record};

/// A connector row. Construct with [`Connector::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "UncheckedConnector")]
pub struct Connector {
    urr: Urr,
    category: Uuid,
    proper_class: ProperClass,
    from_node: Urr,
    to_node: Urr,
}

/// Connector fields before the proper-class check.
///
/// This is the shape connectors arrive in from outside (documents, rows);
/// `Connector::try_from` applies the construction rules.
#[derive(Debug, Clone, Deserialize)]
pub struct UncheckedConnector {
    pub urr: Urr,
    pub category: Uuid,
    #[serde(default)]
    pub proper_class: Option<ProperClass>,
    pub from_node: Urr,
    pub to_node: Urr,
}

impl Connector {
    /// Builds a connector, rejecting proper classes other than
    /// Connector, Visibility, and BoundaryReference.
    pub fn new(
        urr: impl Into<String>,
        category: Uuid,
        proper_class: ProperClass,
        from_node: Urr,
        to_node: Urr,
    ) -> Result<Self, ModelError> {
        if !proper_class.is_connector_class() {
            return Err(ModelError::InvalidProperClass { proper_class });
        }
        Ok(Connector {
            urr: Urr(urr.into()),
            category,
            proper_class,
            from_node,
            to_node,
        })
    }

    pub fn urr(&self) -> &Urr {
        &self.urr
    }

    pub fn category(&self) -> &Uuid {
        &self.category
    }

    pub fn proper_class(&self) -> ProperClass {
        self.proper_class
    }

    pub fn from_node(&self) -> &Urr {
        &self.from_node
    }

    pub fn to_node(&self) -> &Urr {
        &self.to_node
    }

    pub fn with_proper_class(self, proper_class: ProperClass) -> Result<Self, ModelError> {
        Connector::new(self.urr.0, self.category, proper_class, self.from_node, self.to_node)
    }

    pub fn with_category(mut self, category: Uuid) -> Self {
        self.category = category;
        self
    }

    pub fn with_from_node(mut self, from_node: Urr) -> Self {
        self.from_node = from_node;
        self
    }

    pub fn with_to_node(mut self, to_node: Urr) -> Self {
        self.to_node = to_node;
        self
    }
}

impl TryFrom<UncheckedConnector> for Connector {
    type Error = ModelError;

    fn try_from(raw: UncheckedConnector) -> Result<Self, Self::Error> {
        let proper_class = raw.proper_class.ok_or(ModelError::MissingProperClass)?;
        Connector::new(raw.urr.0, raw.category, proper_class, raw.from_node, raw.to_node)
    }
}

impl Record for Connector {
    const KIND: EntityKind = EntityKind::Connector;

    fn key(&self) -> &str {
        self.urr.as_str()
    }

    fn references(&self) -> Vec<(ForeignKey, &str)> {
        vec![
            (ForeignKey::ConnectorCategory, self.category.as_str()),
            (ForeignKey::ConnectorFromNode, self.from_node.as_str()),
            (ForeignKey::ConnectorToNode, self.to_node.as_str()),
        ]
    }
}

/// Typed-connector extension row.
///
/// Cardinality bounds and flags are semantic values: each field names the
/// identity that stands for the value (e.g. the "true" identity, or the
/// identity for "0..*"), so every field is a foreign key into the identity
/// table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedConnector {
    pub urr: Urr,
    pub min_from: Uuid,
    pub min_to: Uuid,
    pub max_from: Uuid,
    pub max_to: Uuid,
    pub is_navigable_from: Uuid,
    pub is_navigable_to: Uuid,
    pub is_container_from: Uuid,
    pub is_container_to: Uuid,
    pub from_edge_end: Uuid,
    pub to_edge_end: Uuid,
}

impl TypedConnector {
    /// Builds an extension whose every identity-valued field is `value`.
    pub fn uniform(urr: impl Into<String>, value: &Uuid) -> Self {
        TypedConnector {
            urr: Urr(urr.into()),
            min_from: value.clone(),
            min_to: value.clone(),
            max_from: value.clone(),
            max_to: value.clone(),
            is_navigable_from: value.clone(),
            is_navigable_to: value.clone(),
            is_container_from: value.clone(),
            is_container_to: value.clone(),
            from_edge_end: value.clone(),
            to_edge_end: value.clone(),
        }
    }
}

impl Record for TypedConnector {
    const KIND: EntityKind = EntityKind::TypedConnector;

    fn key(&self) -> &str {
        self.urr.as_str()
    }

    fn references(&self) -> Vec<(ForeignKey, &str)> {
        vec![
            (ForeignKey::TypedConnectorUrr, self.urr.as_str()),
            (ForeignKey::TypedConnectorMinFrom, self.min_from.as_str()),
            (ForeignKey::TypedConnectorMinTo, self.min_to.as_str()),
            (ForeignKey::TypedConnectorMaxFrom, self.max_from.as_str()),
            (ForeignKey::TypedConnectorMaxTo, self.max_to.as_str()),
            (ForeignKey::TypedConnectorIsNavigableFrom, self.is_navigable_from.as_str()),
            (ForeignKey::TypedConnectorIsNavigableTo, self.is_navigable_to.as_str()),
            (ForeignKey::TypedConnectorIsContainerFrom, self.is_container_from.as_str()),
            (ForeignKey::TypedConnectorIsContainerTo, self.is_container_to.as_str()),
            (ForeignKey::TypedConnectorFromEdgeEnd, self.from_edge_end.as_str()),
            (ForeignKey::TypedConnectorToEdgeEnd, self.to_edge_end.as_str()),
        ]
    }
}
