//! Brand CRUD handlers.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{format_timestamp, parse_uuid, require_name};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use dramshelf_metadata::models::BrandRow;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Request to create a new brand.
#[derive(Debug, Deserialize)]
pub struct CreateBrandRequest {
    pub brand_name: String,
}

/// Request to rename a brand.
#[derive(Debug, Deserialize)]
pub struct UpdateBrandRequest {
    pub brand_name: String,
}

/// Brand details.
#[derive(Debug, Serialize)]
pub struct BrandResponse {
    pub brand_id: String,
    pub brand_name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl BrandResponse {
    fn from_row(row: BrandRow) -> ApiResult<Self> {
        Ok(Self {
            brand_id: row.brand_id.to_string(),
            brand_name: row.brand_name,
            created_at: format_timestamp(row.created_at)?,
            updated_at: format_timestamp(row.updated_at)?,
        })
    }
}

/// Brand listing.
#[derive(Debug, Serialize)]
pub struct ListBrandsResponse {
    pub brands: Vec<BrandResponse>,
}

/// POST /v1/brands - Create a brand.
pub async fn create_brand(
    State(state): State<AppState>,
    Json(body): Json<CreateBrandRequest>,
) -> ApiResult<(StatusCode, Json<BrandResponse>)> {
    let name = require_name(&body.brand_name, "brand_name")?;

    if state.metadata.get_brand_by_name(&name).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "brand with name '{name}' already exists"
        )));
    }

    let now = OffsetDateTime::now_utc();
    let row = BrandRow {
        brand_id: Uuid::new_v4(),
        brand_name: name,
        created_at: now,
        updated_at: now,
    };
    state.metadata.create_brand(&row).await?;

    tracing::info!(brand_id = %row.brand_id, name = %row.brand_name, "brand created");
    Ok((StatusCode::CREATED, Json(BrandResponse::from_row(row)?)))
}

/// GET /v1/brands - List all brands.
pub async fn list_brands(State(state): State<AppState>) -> ApiResult<Json<ListBrandsResponse>> {
    let rows = state.metadata.list_brands().await?;
    let brands = rows
        .into_iter()
        .map(BrandResponse::from_row)
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(ListBrandsResponse { brands }))
}

/// GET /v1/brands/{brand_id} - Get a brand.
pub async fn get_brand(
    State(state): State<AppState>,
    Path(brand_id): Path<String>,
) -> ApiResult<Json<BrandResponse>> {
    let brand_id = parse_uuid(&brand_id, "brand ID")?;
    let row = state
        .metadata
        .get_brand(brand_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("brand not found".to_string()))?;
    Ok(Json(BrandResponse::from_row(row)?))
}

/// PUT /v1/brands/{brand_id} - Rename a brand.
pub async fn update_brand(
    State(state): State<AppState>,
    Path(brand_id): Path<String>,
    Json(body): Json<UpdateBrandRequest>,
) -> ApiResult<Json<BrandResponse>> {
    let brand_id = parse_uuid(&brand_id, "brand ID")?;
    let mut row = state
        .metadata
        .get_brand(brand_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("brand not found".to_string()))?;

    let name = require_name(&body.brand_name, "brand_name")?;
    if let Some(existing) = state.metadata.get_brand_by_name(&name).await? {
        if existing.brand_id != brand_id {
            return Err(ApiError::Conflict(format!(
                "brand with name '{name}' already exists"
            )));
        }
    }

    row.brand_name = name;
    row.updated_at = OffsetDateTime::now_utc();
    state.metadata.update_brand(&row).await?;
    Ok(Json(BrandResponse::from_row(row)?))
}

/// DELETE /v1/brands/{brand_id} - Delete a brand.
/// Fails with 409 while bottles still reference it.
pub async fn delete_brand(
    State(state): State<AppState>,
    Path(brand_id): Path<String>,
) -> ApiResult<StatusCode> {
    let brand_id = parse_uuid(&brand_id, "brand ID")?;
    if state.metadata.get_brand(brand_id).await?.is_none() {
        return Err(ApiError::NotFound("brand not found".to_string()));
    }
    state.metadata.delete_brand(brand_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
