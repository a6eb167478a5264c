//! Country and region taxonomy handlers.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{format_timestamp, parse_uuid, require_name};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use dramshelf_metadata::models::{CountryRow, RegionRow};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Request to create a country.
#[derive(Debug, Deserialize)]
pub struct CreateCountryRequest {
    pub country_name: String,
}

/// Country details.
#[derive(Debug, Serialize)]
pub struct CountryResponse {
    pub country_id: String,
    pub country_name: String,
    pub created_at: String,
}

impl CountryResponse {
    fn from_row(row: CountryRow) -> ApiResult<Self> {
        Ok(Self {
            country_id: row.country_id.to_string(),
            country_name: row.country_name,
            created_at: format_timestamp(row.created_at)?,
        })
    }
}

/// Country listing.
#[derive(Debug, Serialize)]
pub struct ListCountriesResponse {
    pub countries: Vec<CountryResponse>,
}

/// Request to create a region under a country.
#[derive(Debug, Deserialize)]
pub struct CreateRegionRequest {
    pub region_name: String,
}

/// Region details.
#[derive(Debug, Serialize)]
pub struct RegionResponse {
    pub region_id: String,
    pub country_id: String,
    pub region_name: String,
    pub created_at: String,
}

impl RegionResponse {
    fn from_row(row: RegionRow) -> ApiResult<Self> {
        Ok(Self {
            region_id: row.region_id.to_string(),
            country_id: row.country_id.to_string(),
            region_name: row.region_name,
            created_at: format_timestamp(row.created_at)?,
        })
    }
}

/// Region listing for one country.
#[derive(Debug, Serialize)]
pub struct ListRegionsResponse {
    pub regions: Vec<RegionResponse>,
}

/// POST /v1/countries - Create a country.
pub async fn create_country(
    State(state): State<AppState>,
    Json(body): Json<CreateCountryRequest>,
) -> ApiResult<(StatusCode, Json<CountryResponse>)> {
    let name = require_name(&body.country_name, "country_name")?;

    if state.metadata.get_country_by_name(&name).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "country with name '{name}' already exists"
        )));
    }

    let row = CountryRow {
        country_id: Uuid::new_v4(),
        country_name: name,
        created_at: OffsetDateTime::now_utc(),
    };
    state.metadata.create_country(&row).await?;

    tracing::info!(country_id = %row.country_id, name = %row.country_name, "country created");
    Ok((StatusCode::CREATED, Json(CountryResponse::from_row(row)?)))
}

/// GET /v1/countries - List all countries.
pub async fn list_countries(
    State(state): State<AppState>,
) -> ApiResult<Json<ListCountriesResponse>> {
    let rows = state.metadata.list_countries().await?;
    let countries = rows
        .into_iter()
        .map(CountryResponse::from_row)
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(ListCountriesResponse { countries }))
}

/// GET /v1/countries/{country_id} - Get a country.
pub async fn get_country(
    State(state): State<AppState>,
    Path(country_id): Path<String>,
) -> ApiResult<Json<CountryResponse>> {
    let country_id = parse_uuid(&country_id, "country ID")?;
    let row = state
        .metadata
        .get_country(country_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("country not found".to_string()))?;
    Ok(Json(CountryResponse::from_row(row)?))
}

/// DELETE /v1/countries/{country_id} - Delete a country.
/// Fails with 409 while distilleries still reference it.
pub async fn delete_country(
    State(state): State<AppState>,
    Path(country_id): Path<String>,
) -> ApiResult<StatusCode> {
    let country_id = parse_uuid(&country_id, "country ID")?;
    if state.metadata.get_country(country_id).await?.is_none() {
        return Err(ApiError::NotFound("country not found".to_string()));
    }
    state.metadata.delete_country(country_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/countries/{country_id}/regions - Create a region.
pub async fn create_region(
    State(state): State<AppState>,
    Path(country_id): Path<String>,
    Json(body): Json<CreateRegionRequest>,
) -> ApiResult<(StatusCode, Json<RegionResponse>)> {
    let country_id = parse_uuid(&country_id, "country ID")?;
    if state.metadata.get_country(country_id).await?.is_none() {
        return Err(ApiError::NotFound("country not found".to_string()));
    }
    let name = require_name(&body.region_name, "region_name")?;

    let row = RegionRow {
        region_id: Uuid::new_v4(),
        country_id,
        region_name: name,
        created_at: OffsetDateTime::now_utc(),
    };
    state.metadata.create_region(&row).await?;

    Ok((StatusCode::CREATED, Json(RegionResponse::from_row(row)?)))
}

/// GET /v1/countries/{country_id}/regions - List regions of a country.
pub async fn list_regions(
    State(state): State<AppState>,
    Path(country_id): Path<String>,
) -> ApiResult<Json<ListRegionsResponse>> {
    let country_id = parse_uuid(&country_id, "country ID")?;
    if state.metadata.get_country(country_id).await?.is_none() {
        return Err(ApiError::NotFound("country not found".to_string()));
    }
    let rows = state.metadata.list_regions(country_id).await?;
    let regions = rows
        .into_iter()
        .map(RegionResponse::from_row)
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(ListRegionsResponse { regions }))
}

/// DELETE /v1/regions/{region_id} - Delete a region.
pub async fn delete_region(
    State(state): State<AppState>,
    Path(region_id): Path<String>,
) -> ApiResult<StatusCode> {
    let region_id = parse_uuid(&region_id, "region ID")?;
    if state.metadata.get_region(region_id).await?.is_none() {
        return Err(ApiError::NotFound("region not found".to_string()));
    }
    state.metadata.delete_region(region_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
