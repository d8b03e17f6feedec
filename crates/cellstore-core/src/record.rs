//! Entity kinds and the [`Record`] trait shared by every stored record.
//!
//! A record knows its own primary key, the foreign-key values it carries,
//! and any client-side validation it needs. Store backends use this to
//! apply the same rules regardless of how rows are physically kept.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::foreign_key::ForeignKey;

/// The five record tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Identity,
    Node,
    Connector,
    TypedConnector,
    Agent,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Identity,
        EntityKind::Node,
        EntityKind::Connector,
        EntityKind::TypedConnector,
        EntityKind::Agent,
    ];

    /// Backing table name.
    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Identity => "identity",
            EntityKind::Node => "node",
            EntityKind::Connector => "connector",
            EntityKind::TypedConnector => "typed_connector",
            EntityKind::Agent => "agent",
        }
    }

    /// Primary-key column name.
    pub fn key_column(self) -> &'static str {
        match self {
            EntityKind::Identity => "uuid",
            _ => "urr",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// A value record that maps to exactly one row of one table.
pub trait Record: Clone + PartialEq {
    /// The table this record lives in.
    const KIND: EntityKind;

    /// Primary-key value.
    fn key(&self) -> &str;

    /// Every set foreign-key value, in [`ForeignKey::ALL`] order.
    ///
    /// Nullable references that are unset are omitted.
    fn references(&self) -> Vec<(ForeignKey, &str)>;

    /// Field-level checks performed before any backend interaction.
    fn validate(&self) -> Result<(), ModelError> {
        Ok(())
    }
}
