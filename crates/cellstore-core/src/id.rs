//! Key newtypes for stored records.
//!
//! Both keys wrap a `String`, but they are distinct types so that a [`Urr`]
//! (persistent structural reference) cannot be passed where a [`Uuid`]
//! (identity correlation key) is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Persistent reference: the primary key of structural records
/// (nodes, connectors, typed connectors, agents).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Urr(pub String);

/// External correlation key of an [`Identity`](crate::identity::Identity),
/// and the target of every identity-valued foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uuid(pub String);

impl Urr {
    pub fn new(value: impl Into<String>) -> Self {
        Urr(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Uuid {
    pub fn new(value: impl Into<String>) -> Self {
        Uuid(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Urr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Urr {
    fn from(value: &str) -> Self {
        Urr(value.to_string())
    }
}

impl From<&str> for Uuid {
    fn from(value: &str) -> Self {
        Uuid(value.to_string())
    }
}

/// A uuid can name a structural record directly (the common case where a
/// node's urr is the uuid of the identity it realises).
impl From<&Uuid> for Urr {
    fn from(value: &Uuid) -> Self {
        Urr(value.0.clone())
    }
}
