//! The [`RecordStore`] trait defining the storage contract for model records.
//!
//! One insert/update/get triple per entity kind, each call writing or
//! reading exactly one row as its own unit of work. All backends
//! (InMemoryStore, SqliteStore) implement this trait with identical error
//! semantics:
//!
//! - `insert_*`: [`StoreError::DuplicateKey`] on a primary-key clash,
//!   [`StoreError::ReferentialIntegrity`] on an unresolved foreign key,
//!   [`StoreError::Validation`] before any backend work.
//! - `update_*`: [`StoreError::NotFound`] when the key does not exist
//!   (never reported as a duplicate), otherwise as insert.
//! - `get_*`: the record, or [`StoreError::NotFound`].
//!
//! The trait is synchronous; a backend holding a `!Sync` connection is
//! shared behind the caller's own lock.

use cellstore_core::{Agent, Connector, EntityKind, Identity, Node, TypedConnector};

use crate::error::StoreError;

/// The storage contract for model records.
pub trait RecordStore {
    // -------------------------------------------------------------------
    // Identity
    // -------------------------------------------------------------------

    /// Inserts a naming record.
    fn insert_identity(&mut self, identity: &Identity) -> Result<(), StoreError>;

    /// Replaces the fields of an existing naming record.
    fn update_identity(&mut self, identity: &Identity) -> Result<(), StoreError>;

    /// Retrieves a naming record by uuid.
    fn get_identity(&self, uuid: &str) -> Result<Identity, StoreError>;

    // -------------------------------------------------------------------
    // Node
    // -------------------------------------------------------------------

    fn insert_node(&mut self, node: &Node) -> Result<(), StoreError>;

    fn update_node(&mut self, node: &Node) -> Result<(), StoreError>;

    fn get_node(&self, urr: &str) -> Result<Node, StoreError>;

    // -------------------------------------------------------------------
    // Connector
    // -------------------------------------------------------------------

    fn insert_connector(&mut self, connector: &Connector) -> Result<(), StoreError>;

    fn update_connector(&mut self, connector: &Connector) -> Result<(), StoreError>;

    fn get_connector(&self, urr: &str) -> Result<Connector, StoreError>;

    // -------------------------------------------------------------------
    // Typed connector
    // -------------------------------------------------------------------

    /// Inserts a typed-connector extension. Its base connector row must
    /// already exist.
    fn insert_typed_connector(&mut self, typed: &TypedConnector) -> Result<(), StoreError>;

    fn update_typed_connector(&mut self, typed: &TypedConnector) -> Result<(), StoreError>;

    fn get_typed_connector(&self, urr: &str) -> Result<TypedConnector, StoreError>;

    // -------------------------------------------------------------------
    // Agent
    // -------------------------------------------------------------------

    fn insert_agent(&mut self, agent: &Agent) -> Result<(), StoreError>;

    fn update_agent(&mut self, agent: &Agent) -> Result<(), StoreError>;

    fn get_agent(&self, urr: &str) -> Result<Agent, StoreError>;

    // -------------------------------------------------------------------
    // Query methods
    // -------------------------------------------------------------------

    /// Number of stored rows of the given kind.
    fn count(&self, entity: EntityKind) -> Result<u64, StoreError>;
}
