//! Persisted migration state per feature.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The schema version counter of one feature, with its history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationRecord {
    /// Feature the migrations belong to (e.g. `html`).
    pub feature: String,
    /// Version returned by the last successful step.
    pub version: u32,
    /// Ids of the steps applied so far, in order.
    #[serde(default)]
    pub applied_migrations: Vec<String>,
    pub last_applied_at: DateTime<Utc>,
}

impl MigrationRecord {
    /// Record for a feature whose first step just completed.
    pub fn new(feature: impl Into<String>, version: u32, migration_id: &str) -> Self {
        Self {
            feature: feature.into(),
            version,
            applied_migrations: vec![migration_id.to_string()],
            last_applied_at: Utc::now(),
        }
    }

    /// Advance to `version` after `migration_id` succeeded.
    pub fn advance(&mut self, version: u32, migration_id: &str) {
        self.version = version;
        self.applied_migrations.push(migration_id.to_string());
        self.last_applied_at = Utc::now();
    }
}
