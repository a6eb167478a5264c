//! Distillery repository trait.

use crate::error::MetadataResult;
use crate::models::{DistilleryNameRow, DistilleryRow};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for distillery records.
#[async_trait]
pub trait DistilleryRepo: Send + Sync {
    /// Create a new distillery. Fails with `AlreadyExists` on a duplicate
    /// name (case-insensitive).
    async fn create_distillery(&self, distillery: &DistilleryRow) -> MetadataResult<()>;

    /// Get a distillery by ID.
    async fn get_distillery(&self, distillery_id: Uuid) -> MetadataResult<Option<DistilleryRow>>;

    /// Get a distillery by name (case-insensitive).
    async fn get_distillery_by_name(&self, name: &str) -> MetadataResult<Option<DistilleryRow>>;

    /// List distilleries ordered by name, with limit/offset paging.
    async fn list_distilleries(&self, limit: i64, offset: i64)
    -> MetadataResult<Vec<DistilleryRow>>;

    /// Total number of distilleries.
    async fn count_distilleries(&self) -> MetadataResult<i64>;

    /// Update an existing distillery.
    async fn update_distillery(&self, distillery: &DistilleryRow) -> MetadataResult<()>;

    /// Delete a distillery by ID.
    async fn delete_distillery(&self, distillery_id: Uuid) -> MetadataResult<()>;

    /// All (id, name) pairs ordered by name, for bulk-loading the name index.
    async fn list_distillery_names(&self) -> MetadataResult<Vec<DistilleryNameRow>>;
}
