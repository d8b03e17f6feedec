//! Storage error types for cellstore-storage.
//!
//! [`StoreError`] is the record-store taxonomy: validation, duplicate key,
//! not found, referential integrity, and an escape hatch for backend
//! failures that cannot be classified. [`SerializationError`] is what the
//! graph serializer returns, wrapping the first `StoreError` with the
//! domain, entity, kind, and key it occurred on.

use cellstore_core::{EntityKind, ForeignKey, ModelError, ProperClass};
use thiserror::Error;

/// Errors produced by record-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A field-level invariant was violated. Raised before any backend call.
    #[error("validation failed on {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A row with the same primary key already exists.
    #[error("duplicate key: {entity} '{key}' already exists")]
    DuplicateKey { entity: EntityKind, key: String },

    /// No row with this primary key exists.
    #[error("not found: {entity} '{key}'")]
    NotFound { entity: EntityKind, key: String },

    /// A foreign-key value did not resolve.
    #[error("referential integrity violation: {constraint} on {entity} '{key}'")]
    ReferentialIntegrity {
        entity: EntityKind,
        key: String,
        constraint: ForeignKey,
    },

    /// The backend failed in a way that could not be classified.
    #[error("unknown backend failure: {raw}")]
    UnknownBackendFailure { raw: String },

    /// JSON serialization or deserialization of a payload column failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Applying the embedded schema failed.
    #[error("migration error: {0}")]
    Migration(String),
}

impl StoreError {
    /// The violated constraint, for referential integrity errors.
    pub fn constraint(&self) -> Option<ForeignKey> {
        match self {
            StoreError::ReferentialIntegrity { constraint, .. } => Some(*constraint),
            _ => None,
        }
    }
}

impl From<ModelError> for StoreError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation { field, reason } => StoreError::Validation { field, reason },
            ModelError::InvalidProperClass { .. }
            | ModelError::MissingProperClass
            | ModelError::UnknownProperClass(_) => StoreError::Validation {
                field: "proper_class",
                reason: err.to_string(),
            },
            other => StoreError::Validation {
                field: "record",
                reason: other.to_string(),
            },
        }
    }
}

/// Non-write failures (opening, pragmas, reads) carry no constraint
/// semantics and surface as unclassified backend failures. Writes go
/// through the classifier instead.
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::UnknownBackendFailure {
            raw: err.to_string(),
        }
    }
}

/// Errors returned by [`Serializer::serialize`](crate::serialize::Serializer::serialize).
#[derive(Debug, Error)]
pub enum SerializationError {
    /// A record-store call failed; the rest of the domain was abandoned.
    #[error("failed to store {entity} '{key}' in domain '{domain}': {source}")]
    Store {
        domain: String,
        entity: EntityKind,
        /// Structural kind being written, `None` for naming records.
        kind: Option<ProperClass>,
        key: String,
        #[source]
        source: StoreError,
    },

    /// Cancellation was requested before `domain` finished.
    #[error("serialization cancelled in domain '{domain}' after {completed_domains} complete domain(s)")]
    Cancelled {
        domain: String,
        completed_domains: usize,
    },
}

impl SerializationError {
    /// The wrapped store error, if any.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            SerializationError::Store { source, .. } => Some(source),
            SerializationError::Cancelled { .. } => None,
        }
    }
}
