//! Agent records: the people and systems that own semantic models.

use serde::{Deserialize, Serialize};

use crate::foreign_key::ForeignKey;
use crate::id::{Urr, Uuid};
use crate::record::{EntityKind, Record};

/// An agent row. Both `urr` and `uuid` reference identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Agent {
    pub urr: Urr,
    pub uuid: Uuid,
    pub email: String,
    pub password: String,
    pub mobile: String,
    pub first_name: String,
    pub last_name: String,
    pub alias: String,
}

impl Record for Agent {
    const KIND: EntityKind = EntityKind::Agent;

    fn key(&self) -> &str {
        self.urr.as_str()
    }

    fn references(&self) -> Vec<(ForeignKey, &str)> {
        vec![
            (ForeignKey::AgentUrr, self.urr.as_str()),
            (ForeignKey::AgentUuid, self.uuid.as_str()),
        ]
    }
}
