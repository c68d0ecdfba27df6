//! Application context shared by migrations.

use std::sync::Arc;

use crate::config::Config;
use crate::store::backends::memory::MemoryStore;
use crate::store::{ContentDefinitionStore, DocumentSession, VersionStore};

/// Root application context.
///
/// Holds the storage collaborators behind trait objects so migrations never
/// depend on a concrete backend.
#[derive(Clone)]
pub struct Context {
    /// Part and type definition registry.
    pub definitions: Arc<dyn ContentDefinitionStore>,
    /// Content item document session.
    pub session: Arc<dyn DocumentSession>,
    /// Per-feature schema versions.
    pub versions: Arc<dyn VersionStore>,
    /// Application configuration.
    pub config: Arc<Config>,
}

impl Context {
    /// Creates a new context with the given dependencies.
    pub fn new(
        definitions: Arc<dyn ContentDefinitionStore>,
        session: Arc<dyn DocumentSession>,
        versions: Arc<dyn VersionStore>,
        config: Config,
    ) -> Self {
        Self {
            definitions,
            session,
            versions,
            config: Arc::new(config),
        }
    }

    /// Creates a context where one [`MemoryStore`] serves every role.
    pub fn from_store(store: Arc<MemoryStore>, config: Config) -> Self {
        Self::new(store.clone(), store.clone(), store, config)
    }

    /// Documents fetched and committed per batch.
    pub fn batch_size(&self) -> usize {
        self.config.migrations.batch_size
    }
}
