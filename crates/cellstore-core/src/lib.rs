//! Entity model and semantic graph for cellstore.
//!
//! Records ([`Identity`], [`Node`], [`Connector`], [`TypedConnector`],
//! [`Agent`]) are plain values with field-wise equality. The
//! [`ForeignKey`] catalogue names every relationship between their tables,
//! and [`SemanticGraph`] is the polymorphic graph a serializer walks through
//! the [`GraphSource`] trait.

pub mod agent;
pub mod connector;
pub mod error;
pub mod foreign_key;
pub mod graph;
pub mod id;
pub mod identity;
pub mod node;
pub mod proper_class;
pub mod record;

// Re-export commonly used types
pub use agent::Agent;
pub use connector::{Connector, TypedConnector, UncheckedConnector};
pub use error::ModelError;
pub use foreign_key::ForeignKey;
pub use graph::{
    DocumentElement, Element, ElementId, GraphDocument, GraphSource, SemanticGraph,
    StructuralRecord,
};
pub use id::{Urr, Uuid};
pub use identity::{Identity, MAX_NAME_LENGTH};
pub use node::Node;
pub use proper_class::{Cardinality, ProperClass};
pub use record::{EntityKind, Record};
