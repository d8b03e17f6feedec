//! Classification of backend failures into the [`StoreError`] taxonomy.
//!
//! Backends report what went wrong as a [`BackendFailure`]: a structured
//! signal built from result codes and constraint catalogues, never from
//! error message text. [`ConstraintClassifier::classify`] turns that signal
//! plus the [`WriteContext`] of the failed call into exactly one
//! `StoreError` category.

use cellstore_core::{EntityKind, ForeignKey};
use rusqlite::ffi;

use crate::error::StoreError;

/// The kind of write being classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Insert,
    Update,
}

/// What a store call was doing when it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteContext<'a> {
    pub entity: EntityKind,
    pub key: &'a str,
    pub op: WriteOp,
}

impl<'a> WriteContext<'a> {
    pub fn new(entity: EntityKind, key: &'a str, op: WriteOp) -> Self {
        WriteContext { entity, key, op }
    }
}

/// A structured failure signal from a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendFailure {
    /// The primary key (or another unique key) already exists.
    PrimaryKeyConflict,
    /// A foreign-key value did not resolve; the backend identified which.
    ForeignKeyUnresolved(ForeignKey),
    /// A check constraint rejected the row.
    CheckFailed,
    /// A required column was null.
    NotNull,
    /// An update matched no row.
    NoRowsAffected,
    /// A keyed read matched no row.
    NoSuchRow,
    /// Anything else, with the backend's own description.
    Other(String),
}

impl BackendFailure {
    /// Reads the extended result code of a SQLite failure.
    ///
    /// Foreign-key failures are not mapped here: SQLite's result code does
    /// not say which constraint failed, so the SQLite store looks up the
    /// row's parent keys instead.
    pub fn from_sqlite(err: &rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, _) => match code.extended_code {
                ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
                    BackendFailure::PrimaryKeyConflict
                }
                ffi::SQLITE_CONSTRAINT_CHECK => BackendFailure::CheckFailed,
                ffi::SQLITE_CONSTRAINT_NOTNULL => BackendFailure::NotNull,
                _ => BackendFailure::Other(err.to_string()),
            },
            rusqlite::Error::QueryReturnedNoRows => BackendFailure::NoSuchRow,
            other => BackendFailure::Other(other.to_string()),
        }
    }
}

/// Maps backend failures to store errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintClassifier;

impl ConstraintClassifier {
    pub fn classify(failure: BackendFailure, ctx: &WriteContext<'_>) -> StoreError {
        let entity = ctx.entity;
        let key = ctx.key.to_string();
        match failure {
            // Zero rows affected means the target does not exist; an update
            // is never reported as a duplicate.
            BackendFailure::NoRowsAffected | BackendFailure::NoSuchRow => {
                StoreError::NotFound { entity, key }
            }
            BackendFailure::PrimaryKeyConflict => match ctx.op {
                WriteOp::Insert => StoreError::DuplicateKey { entity, key },
                WriteOp::Update => StoreError::UnknownBackendFailure {
                    raw: format!("unique key conflict while updating {entity} '{key}'"),
                },
            },
            BackendFailure::ForeignKeyUnresolved(constraint) => StoreError::ReferentialIntegrity {
                entity,
                key,
                constraint,
            },
            BackendFailure::CheckFailed => StoreError::Validation {
                field: "row",
                reason: format!("{entity} '{key}' was rejected by a check constraint"),
            },
            BackendFailure::NotNull => StoreError::Validation {
                field: "row",
                reason: format!("{entity} '{key}' is missing a required column"),
            },
            BackendFailure::Other(raw) => StoreError::UnknownBackendFailure { raw },
        }
    }
}
