//! Vertex-like structural records.
//!
//! A [`Node`] is container-capable: its `container` field names another
//! node by primary key. The relationship may form cycles at the data level,
//! so it is held as a key, never as an owned reference; the backing store's
//! foreign key is what enforces it.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::foreign_key::ForeignKey;
use crate::id::{Urr, Uuid};
use crate::proper_class::{Cardinality, ProperClass};
use crate::record::{EntityKind, Record};

/// A structural node row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub urr: Urr,
    /// The identity this node realises.
    pub uuid: Uuid,
    /// The identity classifying what kind of node this is.
    pub category: Uuid,
    /// Containing node; `None` at the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Urr>,
    #[serde(default)]
    pub is_abstract: bool,
    pub proper_class: ProperClass,
    #[serde(default)]
    pub max_cardinality_in_container: Cardinality,
    /// Opaque structured payload, stored as JSON text.
    #[serde(default)]
    pub content: serde_json::Value,
}

impl Node {
    /// Creates a root-level, concrete node with unbounded cardinality and
    /// no content.
    pub fn new(urr: impl Into<String>, uuid: Uuid, category: Uuid, proper_class: ProperClass) -> Self {
        Node {
            urr: Urr(urr.into()),
            uuid,
            category,
            container: None,
            is_abstract: false,
            proper_class,
            max_cardinality_in_container: Cardinality::Unbounded,
            content: serde_json::Value::Null,
        }
    }

    pub fn within(mut self, container: Urr) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_category(mut self, category: Uuid) -> Self {
        self.category = category;
        self
    }

    pub fn with_content(mut self, content: serde_json::Value) -> Self {
        self.content = content;
        self
    }
}

// `serde_json::Value` has no `Hash`; its canonical text stands in for it,
// which agrees with `Value` equality.
impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.urr.hash(state);
        self.uuid.hash(state);
        self.category.hash(state);
        self.container.hash(state);
        self.is_abstract.hash(state);
        self.proper_class.hash(state);
        self.max_cardinality_in_container.hash(state);
        self.content.to_string().hash(state);
    }
}

impl Record for Node {
    const KIND: EntityKind = EntityKind::Node;

    fn key(&self) -> &str {
        self.urr.as_str()
    }

    fn references(&self) -> Vec<(ForeignKey, &str)> {
        let mut refs = vec![
            (ForeignKey::NodeUuid, self.uuid.as_str()),
            (ForeignKey::NodeCategory, self.category.as_str()),
        ];
        if let Some(container) = &self.container {
            refs.push((ForeignKey::NodeContainer, container.as_str()));
        }
        refs
    }
}
