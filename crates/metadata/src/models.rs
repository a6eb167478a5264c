//! Database models mapping to the collection schema.

use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// Geographic taxonomy
// =============================================================================

/// Country record.
#[derive(Debug, Clone, FromRow)]
pub struct CountryRow {
    pub country_id: Uuid,
    pub country_name: String,
    pub created_at: OffsetDateTime,
}

/// Region record, scoped to a country (e.g. Islay within Scotland).
#[derive(Debug, Clone, FromRow)]
pub struct RegionRow {
    pub region_id: Uuid,
    pub country_id: Uuid,
    pub region_name: String,
    pub created_at: OffsetDateTime,
}

// =============================================================================
// Brands
// =============================================================================

/// Independent bottler / brand record.
#[derive(Debug, Clone, FromRow)]
pub struct BrandRow {
    pub brand_id: Uuid,
    pub brand_name: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

// =============================================================================
// Distilleries
// =============================================================================

/// Distillery record.
#[derive(Debug, Clone, FromRow)]
pub struct DistilleryRow {
    pub distillery_id: Uuid,
    /// Display name, unique case-insensitively.
    pub distillery_name: String,
    pub country_id: Uuid,
    pub region_id: Option<Uuid>,
    pub founded_year: Option<i64>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Projection of a distillery's searchable name, used to build the
/// in-memory name index without pulling full rows.
#[derive(Debug, Clone, FromRow)]
pub struct DistilleryNameRow {
    pub distillery_id: Uuid,
    pub distillery_name: String,
}

// =============================================================================
// Bottles
// =============================================================================

/// Whisky bottle record.
#[derive(Debug, Clone, FromRow)]
pub struct BottleRow {
    pub bottle_id: Uuid,
    pub bottle_name: String,
    pub distillery_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub age_years: Option<i64>,
    /// Alcohol by volume in percent (e.g. 46.3).
    pub abv: Option<f64>,
    pub volume_cl: Option<i64>,
    pub bottled_year: Option<i64>,
    pub notes: Option<String>,
    /// Personal rating, 0-100.
    pub rating: Option<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
