//! Bottle repository trait.

use crate::error::MetadataResult;
use crate::models::BottleRow;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for whisky bottle records.
#[async_trait]
pub trait BottleRepo: Send + Sync {
    /// Create a new bottle.
    async fn create_bottle(&self, bottle: &BottleRow) -> MetadataResult<()>;

    /// Get a bottle by ID.
    async fn get_bottle(&self, bottle_id: Uuid) -> MetadataResult<Option<BottleRow>>;

    /// List bottles ordered by name, with limit/offset paging.
    async fn list_bottles(&self, limit: i64, offset: i64) -> MetadataResult<Vec<BottleRow>>;

    /// List bottles belonging to a distillery.
    async fn list_bottles_for_distillery(
        &self,
        distillery_id: Uuid,
    ) -> MetadataResult<Vec<BottleRow>>;

    /// Total number of bottles.
    async fn count_bottles(&self) -> MetadataResult<i64>;

    /// Update an existing bottle.
    async fn update_bottle(&self, bottle: &BottleRow) -> MetadataResult<()>;

    /// Delete a bottle by ID.
    async fn delete_bottle(&self, bottle_id: Uuid) -> MetadataResult<()>;
}
