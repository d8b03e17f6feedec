//! In-memory implementation of [`RecordStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and anywhere
//! persistence isn't needed. It keeps rows in HashMaps and enforces the same
//! primary-key and foreign-key rules as the SQLite backend, reporting
//! failures through the same [`ConstraintClassifier`]. Every check runs
//! before any map is touched, so a rejected write leaves no trace.

use std::collections::HashMap;

use cellstore_core::{
    Agent, Connector, EntityKind, ForeignKey, Identity, Node, Record, TypedConnector,
};

use crate::constraint::{BackendFailure, ConstraintClassifier, WriteContext, WriteOp};
use crate::error::StoreError;
use crate::traits::RecordStore;

/// In-memory implementation of [`RecordStore`].
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    identities: HashMap<String, Identity>,
    nodes: HashMap<String, Node>,
    connectors: HashMap<String, Connector>,
    typed_connectors: HashMap<String, TypedConnector>,
    agents: HashMap<String, Agent>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn contains(&self, entity: EntityKind, key: &str) -> bool {
        match entity {
            EntityKind::Identity => self.identities.contains_key(key),
            EntityKind::Node => self.nodes.contains_key(key),
            EntityKind::Connector => self.connectors.contains_key(key),
            EntityKind::TypedConnector => self.typed_connectors.contains_key(key),
            EntityKind::Agent => self.agents.contains_key(key),
        }
    }

    /// First foreign key of `record` that would not resolve once the row is
    /// written. A row may reference itself (a node contained in itself).
    fn first_unresolved<R: Record>(&self, record: &R) -> Option<ForeignKey> {
        record
            .references()
            .into_iter()
            .filter(|(fk, value)| {
                let self_reference = fk.parent() == R::KIND && *value == record.key();
                !self_reference && !self.contains(fk.parent(), value)
            })
            .map(|(fk, _)| fk)
            .min_by_key(|fk| fk.ordinal())
    }

    /// Applies validation and the key rules for `op`.
    fn check_write<R: Record>(&self, record: &R, op: WriteOp) -> Result<(), StoreError> {
        record.validate()?;
        let exists = self.contains(R::KIND, record.key());
        let failure = match op {
            WriteOp::Insert if exists => Some(BackendFailure::PrimaryKeyConflict),
            WriteOp::Update if !exists => Some(BackendFailure::NoRowsAffected),
            _ => self
                .first_unresolved(record)
                .map(BackendFailure::ForeignKeyUnresolved),
        };
        match failure {
            Some(failure) => Err(ConstraintClassifier::classify(
                failure,
                &WriteContext::new(R::KIND, record.key(), op),
            )),
            None => Ok(()),
        }
    }

    fn lookup<R: Record>(map: &HashMap<String, R>, key: &str) -> Result<R, StoreError> {
        map.get(key).cloned().ok_or_else(|| StoreError::NotFound {
            entity: R::KIND,
            key: key.to_string(),
        })
    }
}

impl RecordStore for InMemoryStore {
    fn insert_identity(&mut self, identity: &Identity) -> Result<(), StoreError> {
        self.check_write(identity, WriteOp::Insert)?;
        self.identities
            .insert(identity.key().to_string(), identity.clone());
        Ok(())
    }

    fn update_identity(&mut self, identity: &Identity) -> Result<(), StoreError> {
        self.check_write(identity, WriteOp::Update)?;
        self.identities
            .insert(identity.key().to_string(), identity.clone());
        Ok(())
    }

    fn get_identity(&self, uuid: &str) -> Result<Identity, StoreError> {
        Self::lookup(&self.identities, uuid)
    }

    fn insert_node(&mut self, node: &Node) -> Result<(), StoreError> {
        self.check_write(node, WriteOp::Insert)?;
        self.nodes.insert(node.key().to_string(), node.clone());
        Ok(())
    }

    fn update_node(&mut self, node: &Node) -> Result<(), StoreError> {
        self.check_write(node, WriteOp::Update)?;
        self.nodes.insert(node.key().to_string(), node.clone());
        Ok(())
    }

    fn get_node(&self, urr: &str) -> Result<Node, StoreError> {
        Self::lookup(&self.nodes, urr)
    }

    fn insert_connector(&mut self, connector: &Connector) -> Result<(), StoreError> {
        self.check_write(connector, WriteOp::Insert)?;
        self.connectors
            .insert(connector.key().to_string(), connector.clone());
        Ok(())
    }

    fn update_connector(&mut self, connector: &Connector) -> Result<(), StoreError> {
        self.check_write(connector, WriteOp::Update)?;
        self.connectors
            .insert(connector.key().to_string(), connector.clone());
        Ok(())
    }

    fn get_connector(&self, urr: &str) -> Result<Connector, StoreError> {
        Self::lookup(&self.connectors, urr)
    }

    fn insert_typed_connector(&mut self, typed: &TypedConnector) -> Result<(), StoreError> {
        self.check_write(typed, WriteOp::Insert)?;
        self.typed_connectors
            .insert(typed.key().to_string(), typed.clone());
        Ok(())
    }

    fn update_typed_connector(&mut self, typed: &TypedConnector) -> Result<(), StoreError> {
        self.check_write(typed, WriteOp::Update)?;
        self.typed_connectors
            .insert(typed.key().to_string(), typed.clone());
        Ok(())
    }

    fn get_typed_connector(&self, urr: &str) -> Result<TypedConnector, StoreError> {
        Self::lookup(&self.typed_connectors, urr)
    }

    fn insert_agent(&mut self, agent: &Agent) -> Result<(), StoreError> {
        self.check_write(agent, WriteOp::Insert)?;
        self.agents.insert(agent.key().to_string(), agent.clone());
        Ok(())
    }

    fn update_agent(&mut self, agent: &Agent) -> Result<(), StoreError> {
        self.check_write(agent, WriteOp::Update)?;
        self.agents.insert(agent.key().to_string(), agent.clone());
        Ok(())
    }

    fn get_agent(&self, urr: &str) -> Result<Agent, StoreError> {
        Self::lookup(&self.agents, urr)
    }

    fn count(&self, entity: EntityKind) -> Result<u64, StoreError> {
        let len = match entity {
            EntityKind::Identity => self.identities.len(),
            EntityKind::Node => self.nodes.len(),
            EntityKind::Connector => self.connectors.len(),
            EntityKind::TypedConnector => self.typed_connectors.len(),
            EntityKind::Agent => self.agents.len(),
        };
        Ok(len as u64)
    }
}
