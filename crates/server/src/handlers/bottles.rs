//! Bottle CRUD handlers.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{PageParams, format_timestamp, parse_uuid, require_name, resolve_paging};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use dramshelf_metadata::models::BottleRow;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Request to create a new bottle.
#[derive(Debug, Deserialize)]
pub struct CreateBottleRequest {
    pub bottle_name: String,
    pub distillery_id: String,
    pub brand_id: Option<String>,
    pub age_years: Option<i64>,
    pub abv: Option<f64>,
    pub volume_cl: Option<i64>,
    pub bottled_year: Option<i64>,
    pub notes: Option<String>,
    pub rating: Option<i64>,
}

/// Request to update an existing bottle. Absent fields stay unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateBottleRequest {
    pub bottle_name: Option<String>,
    pub brand_id: Option<String>,
    pub age_years: Option<i64>,
    pub abv: Option<f64>,
    pub volume_cl: Option<i64>,
    pub bottled_year: Option<i64>,
    pub notes: Option<String>,
    pub rating: Option<i64>,
}

/// Bottle details.
#[derive(Debug, Serialize)]
pub struct BottleResponse {
    pub bottle_id: String,
    pub bottle_name: String,
    pub distillery_id: String,
    pub brand_id: Option<String>,
    pub age_years: Option<i64>,
    pub abv: Option<f64>,
    pub volume_cl: Option<i64>,
    pub bottled_year: Option<i64>,
    pub notes: Option<String>,
    pub rating: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl BottleResponse {
    fn from_row(row: BottleRow) -> ApiResult<Self> {
        Ok(Self {
            bottle_id: row.bottle_id.to_string(),
            bottle_name: row.bottle_name,
            distillery_id: row.distillery_id.to_string(),
            brand_id: row.brand_id.map(|id| id.to_string()),
            age_years: row.age_years,
            abv: row.abv,
            volume_cl: row.volume_cl,
            bottled_year: row.bottled_year,
            notes: row.notes,
            rating: row.rating,
            created_at: format_timestamp(row.created_at)?,
            updated_at: format_timestamp(row.updated_at)?,
        })
    }
}

/// Paged bottle listing.
#[derive(Debug, Serialize)]
pub struct ListBottlesResponse {
    pub bottles: Vec<BottleResponse>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

fn validate_measurements(
    abv: Option<f64>,
    rating: Option<i64>,
    age_years: Option<i64>,
) -> ApiResult<()> {
    if let Some(abv) = abv {
        if !(0.0..=100.0).contains(&abv) {
            return Err(ApiError::BadRequest("abv must be between 0 and 100".to_string()));
        }
    }
    if let Some(rating) = rating {
        if !(0..=100).contains(&rating) {
            return Err(ApiError::BadRequest(
                "rating must be between 0 and 100".to_string(),
            ));
        }
    }
    if let Some(age) = age_years {
        if age < 0 {
            return Err(ApiError::BadRequest("age_years must not be negative".to_string()));
        }
    }
    Ok(())
}

async fn require_brand(state: &AppState, brand_id: Uuid) -> ApiResult<()> {
    if state.metadata.get_brand(brand_id).await?.is_none() {
        return Err(ApiError::BadRequest(format!("unknown brand: {brand_id}")));
    }
    Ok(())
}

/// POST /v1/bottles - Create a bottle.
pub async fn create_bottle(
    State(state): State<AppState>,
    Json(body): Json<CreateBottleRequest>,
) -> ApiResult<(StatusCode, Json<BottleResponse>)> {
    let name = require_name(&body.bottle_name, "bottle_name")?;
    let distillery_id = parse_uuid(&body.distillery_id, "distillery_id")?;
    let brand_id = body
        .brand_id
        .as_deref()
        .map(|id| parse_uuid(id, "brand_id"))
        .transpose()?;

    validate_measurements(body.abv, body.rating, body.age_years)?;

    if state.metadata.get_distillery(distillery_id).await?.is_none() {
        return Err(ApiError::BadRequest(format!(
            "unknown distillery: {distillery_id}"
        )));
    }
    if let Some(brand_id) = brand_id {
        require_brand(&state, brand_id).await?;
    }

    let now = OffsetDateTime::now_utc();
    let row = BottleRow {
        bottle_id: Uuid::new_v4(),
        bottle_name: name,
        distillery_id,
        brand_id,
        age_years: body.age_years,
        abv: body.abv,
        volume_cl: body.volume_cl,
        bottled_year: body.bottled_year,
        notes: body.notes,
        rating: body.rating,
        created_at: now,
        updated_at: now,
    };
    state.metadata.create_bottle(&row).await?;

    tracing::info!(bottle_id = %row.bottle_id, name = %row.bottle_name, "bottle created");
    Ok((StatusCode::CREATED, Json(BottleResponse::from_row(row)?)))
}

/// GET /v1/bottles - Paged listing ordered by name.
pub async fn list_bottles(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<ListBottlesResponse>> {
    let paging = resolve_paging(&params)?;
    let total = state.metadata.count_bottles().await?;
    let rows = state
        .metadata
        .list_bottles(paging.limit(), paging.offset())
        .await?;

    let bottles = rows
        .into_iter()
        .map(BottleResponse::from_row)
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(Json(ListBottlesResponse {
        bottles,
        page: paging.page,
        per_page: paging.per_page,
        total,
    }))
}

/// GET /v1/bottles/{bottle_id} - Get a bottle.
pub async fn get_bottle(
    State(state): State<AppState>,
    Path(bottle_id): Path<String>,
) -> ApiResult<Json<BottleResponse>> {
    let bottle_id = parse_uuid(&bottle_id, "bottle ID")?;
    let row = state
        .metadata
        .get_bottle(bottle_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("bottle not found".to_string()))?;
    Ok(Json(BottleResponse::from_row(row)?))
}

/// GET /v1/distilleries/{distillery_id}/bottles - Bottles of one distillery.
pub async fn list_bottles_for_distillery(
    State(state): State<AppState>,
    Path(distillery_id): Path<String>,
) -> ApiResult<Json<Vec<BottleResponse>>> {
    let distillery_id = parse_uuid(&distillery_id, "distillery ID")?;
    if state.metadata.get_distillery(distillery_id).await?.is_none() {
        return Err(ApiError::NotFound("distillery not found".to_string()));
    }
    let rows = state.metadata.list_bottles_for_distillery(distillery_id).await?;
    let bottles = rows
        .into_iter()
        .map(BottleResponse::from_row)
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(bottles))
}

/// PUT /v1/bottles/{bottle_id} - Update a bottle.
pub async fn update_bottle(
    State(state): State<AppState>,
    Path(bottle_id): Path<String>,
    Json(body): Json<UpdateBottleRequest>,
) -> ApiResult<Json<BottleResponse>> {
    let bottle_id = parse_uuid(&bottle_id, "bottle ID")?;
    let mut row = state
        .metadata
        .get_bottle(bottle_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("bottle not found".to_string()))?;

    if let Some(name) = &body.bottle_name {
        row.bottle_name = require_name(name, "bottle_name")?;
    }
    if let Some(brand_id) = &body.brand_id {
        let brand_id = parse_uuid(brand_id, "brand_id")?;
        require_brand(&state, brand_id).await?;
        row.brand_id = Some(brand_id);
    }
    if body.age_years.is_some() {
        row.age_years = body.age_years;
    }
    if body.abv.is_some() {
        row.abv = body.abv;
    }
    if body.volume_cl.is_some() {
        row.volume_cl = body.volume_cl;
    }
    if body.bottled_year.is_some() {
        row.bottled_year = body.bottled_year;
    }
    if body.notes.is_some() {
        row.notes = body.notes;
    }
    if body.rating.is_some() {
        row.rating = body.rating;
    }

    validate_measurements(row.abv, row.rating, row.age_years)?;

    row.updated_at = OffsetDateTime::now_utc();
    state.metadata.update_bottle(&row).await?;
    Ok(Json(BottleResponse::from_row(row)?))
}

/// DELETE /v1/bottles/{bottle_id} - Delete a bottle.
pub async fn delete_bottle(
    State(state): State<AppState>,
    Path(bottle_id): Path<String>,
) -> ApiResult<StatusCode> {
    let bottle_id = parse_uuid(&bottle_id, "bottle ID")?;
    if state.metadata.get_bottle(bottle_id).await?.is_none() {
        return Err(ApiError::NotFound("bottle not found".to_string()));
    }
    state.metadata.delete_bottle(bottle_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
