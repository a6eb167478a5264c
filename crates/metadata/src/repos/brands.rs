//! Brand repository trait.

use crate::error::MetadataResult;
use crate::models::BrandRow;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for brand records.
#[async_trait]
pub trait BrandRepo: Send + Sync {
    /// Create a new brand. Fails with `AlreadyExists` on a duplicate name.
    async fn create_brand(&self, brand: &BrandRow) -> MetadataResult<()>;

    /// Get a brand by ID.
    async fn get_brand(&self, brand_id: Uuid) -> MetadataResult<Option<BrandRow>>;

    /// Get a brand by name (case-insensitive).
    async fn get_brand_by_name(&self, name: &str) -> MetadataResult<Option<BrandRow>>;

    /// List all brands ordered by name.
    async fn list_brands(&self) -> MetadataResult<Vec<BrandRow>>;

    /// Update an existing brand.
    async fn update_brand(&self, brand: &BrandRow) -> MetadataResult<()>;

    /// Delete a brand by ID.
    async fn delete_brand(&self, brand_id: Uuid) -> MetadataResult<()>;
}
