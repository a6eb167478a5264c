//! Metadata store abstraction and implementations for Dramshelf.
//!
//! This crate provides the collection data model:
//! - Distilleries and their geographic taxonomy (countries, regions)
//! - Whisky bottles and brands
//! - The bulk name projection feeding the in-memory search index

pub mod error;
pub mod models;
pub mod repos;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use store::{MetadataStore, SqliteStore};

use dramshelf_core::config::MetadataConfig;
use std::sync::Arc;

/// Create a metadata store from configuration.
pub async fn from_config(config: &MetadataConfig) -> MetadataResult<Arc<dyn MetadataStore>> {
    match config {
        MetadataConfig::Sqlite {
            path,
            query_timeout_secs,
        } => {
            let store = SqliteStore::new(path, *query_timeout_secs).await?;
            Ok(Arc::new(store) as Arc<dyn MetadataStore>)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dramshelf_core::config::MetadataConfig;

    #[tokio::test]
    async fn test_from_config_sqlite() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("metadata.db");
        let store = from_config(&MetadataConfig::Sqlite {
            path: db_path,
            query_timeout_secs: None,
        })
        .await
        .unwrap();
        store.health_check().await.unwrap();
    }
}
