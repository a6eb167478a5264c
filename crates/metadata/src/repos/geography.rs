//! Geographic taxonomy repository trait.

use crate::error::MetadataResult;
use crate::models::{CountryRow, RegionRow};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for countries and their regions.
#[async_trait]
pub trait GeographyRepo: Send + Sync {
    /// Create a new country. Fails with `AlreadyExists` on a duplicate name.
    async fn create_country(&self, country: &CountryRow) -> MetadataResult<()>;

    /// Get a country by ID.
    async fn get_country(&self, country_id: Uuid) -> MetadataResult<Option<CountryRow>>;

    /// Get a country by name (case-insensitive).
    async fn get_country_by_name(&self, name: &str) -> MetadataResult<Option<CountryRow>>;

    /// List all countries ordered by name.
    async fn list_countries(&self) -> MetadataResult<Vec<CountryRow>>;

    /// Delete a country by ID. Fails with `Constraint` while distilleries
    /// still reference it.
    async fn delete_country(&self, country_id: Uuid) -> MetadataResult<()>;

    /// Create a new region. Region names are unique within their country.
    async fn create_region(&self, region: &RegionRow) -> MetadataResult<()>;

    /// Get a region by ID.
    async fn get_region(&self, region_id: Uuid) -> MetadataResult<Option<RegionRow>>;

    /// List regions for a country ordered by name.
    async fn list_regions(&self, country_id: Uuid) -> MetadataResult<Vec<RegionRow>>;

    /// Delete a region by ID.
    async fn delete_region(&self, region_id: Uuid) -> MetadataResult<()>;
}
