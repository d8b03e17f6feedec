//! Core error types for cellstore-core.
//!
//! Uses `thiserror` for structured, matchable variants covering record
//! validation and semantic-graph construction.

use thiserror::Error;

use crate::graph::ElementId;
use crate::proper_class::ProperClass;

/// Errors produced while constructing or validating model records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A field-level invariant was violated (e.g. identity name length).
    #[error("{reason}")]
    Validation { field: &'static str, reason: String },

    /// A connector was given a proper class outside its permitted set.
    #[error("proper class {proper_class} is not valid for a connector")]
    InvalidProperClass { proper_class: ProperClass },

    /// A connector was constructed without a proper class.
    #[error("connector proper class must be specified")]
    MissingProperClass,

    /// Text did not name any proper class.
    #[error("unknown proper class: '{0}'")]
    UnknownProperClass(String),

    /// A typed connector extension does not share its base connector's urr.
    #[error("typed connector '{extension}' does not specialise connector '{base}'")]
    SpecializationMismatch { base: String, extension: String },

    /// An element id was not found in the semantic graph.
    #[error("element not found: ElementId({})", .id.0)]
    UnknownElement { id: ElementId },

    /// Attempted to add a child under an element that cannot contain one.
    #[error("element ElementId({}) is not a container", .id.0)]
    NotAContainer { id: ElementId },
}
