//! Naming records.
//!
//! An [`Identity`] names a semantic concept. Every structural record points
//! at identities through its `category` and other identity-valued fields,
//! so identities are always written before anything that references them.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::foreign_key::ForeignKey;
use crate::id::Uuid;
use crate::record::{EntityKind, Record};

/// Longest permitted display name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// A naming record, unique by `uuid`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub uuid: Uuid,
    pub name: String,
    pub plural_name: String,
    pub code_name: String,
    pub plural_code_name: String,
    /// Opaque auxiliary data.
    #[serde(default)]
    pub payload: String,
}

impl Identity {
    pub fn new(
        uuid: impl Into<String>,
        name: impl Into<String>,
        plural_name: impl Into<String>,
        code_name: impl Into<String>,
        plural_code_name: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Identity {
            uuid: Uuid(uuid.into()),
            name: name.into(),
            plural_name: plural_name.into(),
            code_name: code_name.into(),
            plural_code_name: plural_code_name.into(),
            payload: payload.into(),
        }
    }

    /// Shorthand deriving the plural and code names from `name`.
    pub fn named(uuid: impl Into<String>, name: &str) -> Self {
        Identity::new(
            uuid,
            name,
            format!("{name}s"),
            name.to_lowercase(),
            format!("{}s", name.to_lowercase()),
            "",
        )
    }
}

impl Record for Identity {
    const KIND: EntityKind = EntityKind::Identity;

    fn key(&self) -> &str {
        self.uuid.as_str()
    }

    fn references(&self) -> Vec<(ForeignKey, &str)> {
        Vec::new()
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.name.chars().count() > MAX_NAME_LENGTH {
            return Err(ModelError::Validation {
                field: "name",
                reason: format!(
                    "Identity name is invalid (exceeds length limit of {MAX_NAME_LENGTH})"
                ),
            });
        }
        Ok(())
    }
}
