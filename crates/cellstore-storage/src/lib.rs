//! Storage for cellstore semantic models.
//!
//! Provides the [`RecordStore`] trait defining the storage contract that all
//! backends implement, the [`InMemoryStore`] and [`SqliteStore`] backends,
//! and the [`Serializer`] that writes a whole graph through any of them in
//! foreign-key dependency order.
//!
//! # Modules
//!
//! - [`error`]: StoreError and SerializationError
//! - [`constraint`]: backend failure signals and their classification
//! - [`traits`]: RecordStore trait definition
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: migration setup for the SQLite backend
//! - [`sqlite`]: SqliteStore implementation
//! - [`config`]: StoreConfig read from the environment
//! - [`serialize`]: the dependency-ordered graph serializer

pub mod config;
pub mod constraint;
pub mod error;
pub mod memory;
pub mod schema;
pub mod serialize;
pub mod sqlite;
pub mod traits;

// Re-export key types for ergonomic use.
pub use config::StoreConfig;
pub use constraint::{BackendFailure, ConstraintClassifier, WriteContext, WriteOp};
pub use error::{SerializationError, StoreError};
pub use memory::InMemoryStore;
pub use serialize::{serialize, CancellationFlag, SerializeSummary, Serializer};
pub use sqlite::SqliteStore;
pub use traits::RecordStore;
