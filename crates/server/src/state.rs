//! Application state shared across handlers.

use crate::idempotency::{MemoryReplayStore, ReplayCache, ReplayStore};
use async_trait::async_trait;
use dramshelf_core::config::AppConfig;
use dramshelf_core::{NameEntry, NameSearchIndex, NameSource};
use dramshelf_metadata::MetadataStore;
use std::sync::Arc;

/// Bulk name source backed by the distillery table.
///
/// Adapts the metadata store to the name index's loading contract.
pub struct DistilleryNames(pub Arc<dyn MetadataStore>);

#[async_trait]
impl NameSource for DistilleryNames {
    async fn fetch_names(&self) -> dramshelf_core::Result<Vec<NameEntry>> {
        let rows = self
            .0
            .list_distillery_names()
            .await
            .map_err(|e| dramshelf_core::Error::NameSource(e.to_string()))?;
        Ok(rows
            .into_iter()
            .map(|row| NameEntry::new(row.distillery_name, row.distillery_id))
            .collect())
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Metadata store.
    pub metadata: Arc<dyn MetadataStore>,
    /// In-memory distillery name index.
    pub name_index: Arc<NameSearchIndex>,
    /// Idempotency replay cache.
    pub replay: ReplayCache,
}

impl AppState {
    /// Create application state with an in-memory replay store.
    pub fn new(config: AppConfig, metadata: Arc<dyn MetadataStore>) -> Self {
        let store = Arc::new(MemoryReplayStore::new());
        Self::with_replay_store(config, metadata, store)
    }

    /// Create application state over a specific replay store backend.
    pub fn with_replay_store(
        config: AppConfig,
        metadata: Arc<dyn MetadataStore>,
        store: Arc<dyn ReplayStore>,
    ) -> Self {
        let replay = ReplayCache::new(store, config.idempotency.replay_ttl());
        let name_index = Arc::new(NameSearchIndex::new(config.search.score_cutoff));
        Self {
            config: Arc::new(config),
            metadata,
            name_index,
            replay,
        }
    }

    /// Rebuild the name index from the distillery table.
    ///
    /// On failure the currently published index stays as it was.
    pub async fn reload_name_index(&self) -> dramshelf_core::Result<()> {
        let source = DistilleryNames(Arc::clone(&self.metadata));
        self.name_index.load_from_source(&source).await
    }
}
