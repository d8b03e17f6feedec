//! Store configuration.
//!
//! Read from environment variables:
//! - `CELLSTORE_DB_PATH`: SQLite database file path (default: "cellstore.db")
//! - `CELLSTORE_BUSY_TIMEOUT_MS`: how long a write waits on a locked
//!   database before failing (default: 5000)

use std::time::Duration;

pub const DB_PATH_VAR: &str = "CELLSTORE_DB_PATH";
pub const BUSY_TIMEOUT_VAR: &str = "CELLSTORE_BUSY_TIMEOUT_MS";

const DEFAULT_DB_PATH: &str = "cellstore.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Where and how the SQLite backend opens its database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: String,
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            db_path: DEFAULT_DB_PATH.to_string(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl StoreConfig {
    /// Configuration for a database at `path` with the default timeout.
    pub fn at(path: impl Into<String>) -> Self {
        StoreConfig {
            db_path: path.into(),
            ..StoreConfig::default()
        }
    }

    /// Reads the process environment. Unset or unparsable values fall back
    /// to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = StoreConfig::default();
        let db_path = lookup(DB_PATH_VAR).unwrap_or(defaults.db_path);
        let busy_timeout_ms = lookup(BUSY_TIMEOUT_VAR)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(defaults.busy_timeout_ms);
        StoreConfig {
            db_path,
            busy_timeout_ms,
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
