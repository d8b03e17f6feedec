//! Catalogue of every foreign-key relationship between record tables.
//!
//! A [`ForeignKey`] is the structured identifier carried by referential
//! integrity errors. Backends resolve a failed constraint to one of these
//! variants from the child table and column, never from error text.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::EntityKind;

/// One foreign-key constraint: a child column referencing a parent key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKey {
    NodeUuid,
    NodeCategory,
    NodeContainer,
    ConnectorCategory,
    ConnectorFromNode,
    ConnectorToNode,
    TypedConnectorUrr,
    TypedConnectorMinFrom,
    TypedConnectorMinTo,
    TypedConnectorMaxFrom,
    TypedConnectorMaxTo,
    TypedConnectorIsNavigableFrom,
    TypedConnectorIsNavigableTo,
    TypedConnectorIsContainerFrom,
    TypedConnectorIsContainerTo,
    TypedConnectorFromEdgeEnd,
    TypedConnectorToEdgeEnd,
    AgentUrr,
    AgentUuid,
}

impl ForeignKey {
    pub const ALL: [ForeignKey; 19] = [
        ForeignKey::NodeUuid,
        ForeignKey::NodeCategory,
        ForeignKey::NodeContainer,
        ForeignKey::ConnectorCategory,
        ForeignKey::ConnectorFromNode,
        ForeignKey::ConnectorToNode,
        ForeignKey::TypedConnectorUrr,
        ForeignKey::TypedConnectorMinFrom,
        ForeignKey::TypedConnectorMinTo,
        ForeignKey::TypedConnectorMaxFrom,
        ForeignKey::TypedConnectorMaxTo,
        ForeignKey::TypedConnectorIsNavigableFrom,
        ForeignKey::TypedConnectorIsNavigableTo,
        ForeignKey::TypedConnectorIsContainerFrom,
        ForeignKey::TypedConnectorIsContainerTo,
        ForeignKey::TypedConnectorFromEdgeEnd,
        ForeignKey::TypedConnectorToEdgeEnd,
        ForeignKey::AgentUrr,
        ForeignKey::AgentUuid,
    ];

    /// Table holding the referencing column.
    pub fn child(self) -> EntityKind {
        use ForeignKey::*;
        match self {
            NodeUuid | NodeCategory | NodeContainer => EntityKind::Node,
            ConnectorCategory | ConnectorFromNode | ConnectorToNode => EntityKind::Connector,
            AgentUrr | AgentUuid => EntityKind::Agent,
            _ => EntityKind::TypedConnector,
        }
    }

    /// Referencing column in the child table.
    pub fn column(self) -> &'static str {
        use ForeignKey::*;
        match self {
            NodeUuid | AgentUuid => "uuid",
            NodeCategory | ConnectorCategory => "category",
            NodeContainer => "container",
            ConnectorFromNode => "from_node",
            ConnectorToNode => "to_node",
            TypedConnectorUrr | AgentUrr => "urr",
            TypedConnectorMinFrom => "min_from",
            TypedConnectorMinTo => "min_to",
            TypedConnectorMaxFrom => "max_from",
            TypedConnectorMaxTo => "max_to",
            TypedConnectorIsNavigableFrom => "is_navigable_from",
            TypedConnectorIsNavigableTo => "is_navigable_to",
            TypedConnectorIsContainerFrom => "is_container_from",
            TypedConnectorIsContainerTo => "is_container_to",
            TypedConnectorFromEdgeEnd => "from_edge_end",
            TypedConnectorToEdgeEnd => "to_edge_end",
        }
    }

    /// Referenced table. The referenced column is always its primary key.
    pub fn parent(self) -> EntityKind {
        use ForeignKey::*;
        match self {
            NodeContainer | ConnectorFromNode | ConnectorToNode => EntityKind::Node,
            TypedConnectorUrr => EntityKind::Connector,
            _ => EntityKind::Identity,
        }
    }

    /// Constraint name, `fk_<table>_<column>`.
    pub fn name(self) -> String {
        format!("fk_{}_{}", self.child().table(), self.column())
    }

    /// Resolves a child table and column back to its constraint.
    pub fn from_column(child: EntityKind, column: &str) -> Option<ForeignKey> {
        Self::ALL
            .into_iter()
            .find(|fk| fk.child() == child && fk.column() == column)
    }

    /// All constraints declared on `child`, in catalogue order.
    pub fn declared_on(child: EntityKind) -> impl Iterator<Item = ForeignKey> {
        Self::ALL.into_iter().filter(move |fk| fk.child() == child)
    }

    /// Position in [`ForeignKey::ALL`]; used to pick a deterministic
    /// constraint when one row breaks several.
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_table_and_column() {
        assert_eq!(ForeignKey::NodeCategory.name(), "fk_node_category");
        assert_eq!(ForeignKey::ConnectorFromNode.name(), "fk_connector_from_node");
        assert_eq!(
            ForeignKey::TypedConnectorIsContainerFrom.name(),
            "fk_typed_connector_is_container_from"
        );
        assert_eq!(ForeignKey::AgentUuid.name(), "fk_agent_uuid");
    }

    #[test]
    fn from_column_inverts_child_and_column() {
        for fk in ForeignKey::ALL {
            assert_eq!(ForeignKey::from_column(fk.child(), fk.column()), Some(fk));
        }
        assert_eq!(ForeignKey::from_column(EntityKind::Identity, "uuid"), None);
        assert_eq!(ForeignKey::from_column(EntityKind::Node, "content"), None);
    }

    #[test]
    fn ordinal_matches_catalogue_position() {
        for (i, fk) in ForeignKey::ALL.into_iter().enumerate() {
            assert_eq!(fk.ordinal(), i);
        }
    }

    #[test]
    fn identity_declares_no_constraints() {
        assert_eq!(ForeignKey::declared_on(EntityKind::Identity).count(), 0);
        assert_eq!(ForeignKey::declared_on(EntityKind::TypedConnector).count(), 11);
        assert_eq!(ForeignKey::declared_on(EntityKind::Agent).count(), 2);
    }

    #[test]
    fn structural_parents() {
        assert_eq!(ForeignKey::NodeContainer.parent(), EntityKind::Node);
        assert_eq!(ForeignKey::TypedConnectorUrr.parent(), EntityKind::Connector);
        assert_eq!(ForeignKey::TypedConnectorToEdgeEnd.parent(), EntityKind::Identity);
    }
}
