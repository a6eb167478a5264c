//! Distillery CRUD and name search handlers.
//!
//! Write handlers keep the in-memory name index in sync: the index call is
//! made after the corresponding database write commits, so a failed write
//! never touches the index.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{PageParams, format_timestamp, parse_uuid, require_name, resolve_paging};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use dramshelf_metadata::models::DistilleryRow;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

fn default_true() -> bool {
    true
}

/// Request to create a new distillery.
#[derive(Debug, Deserialize)]
pub struct CreateDistilleryRequest {
    pub distillery_name: String,
    pub country_id: String,
    pub region_id: Option<String>,
    pub founded_year: Option<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Request to update an existing distillery.
#[derive(Debug, Deserialize)]
pub struct UpdateDistilleryRequest {
    pub distillery_name: Option<String>,
    pub country_id: Option<String>,
    /// `Some(None)` clears the region; absent leaves it unchanged.
    #[serde(default, with = "double_option")]
    pub region_id: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub founded_year: Option<Option<i64>>,
    pub is_active: Option<bool>,
}

/// Serde helper distinguishing "field absent" from "field null".
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn deserialize<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(de).map(Some)
    }

    #[allow(dead_code)]
    pub fn serialize<T, S>(value: &Option<Option<T>>, ser: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(ser),
            None => ser.serialize_none(),
        }
    }
}

/// Distillery details.
#[derive(Debug, Serialize)]
pub struct DistilleryResponse {
    pub distillery_id: String,
    pub distillery_name: String,
    pub country_id: String,
    pub region_id: Option<String>,
    pub founded_year: Option<i64>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl DistilleryResponse {
    fn from_row(row: DistilleryRow) -> ApiResult<Self> {
        Ok(Self {
            distillery_id: row.distillery_id.to_string(),
            distillery_name: row.distillery_name,
            country_id: row.country_id.to_string(),
            region_id: row.region_id.map(|id| id.to_string()),
            founded_year: row.founded_year,
            is_active: row.is_active,
            created_at: format_timestamp(row.created_at)?,
            updated_at: format_timestamp(row.updated_at)?,
        })
    }
}

/// Paged distillery listing.
#[derive(Debug, Serialize)]
pub struct ListDistilleriesResponse {
    pub distilleries: Vec<DistilleryResponse>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

/// Name search query.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// A search hit: just the name and identifier, straight from the index.
#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub distillery_id: String,
    pub distillery_name: String,
}

/// Search results, best match first.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}

/// Resolve and validate the country/region pair referenced by a write.
async fn resolve_geography(
    state: &AppState,
    country_id: Uuid,
    region_id: Option<Uuid>,
) -> ApiResult<()> {
    if state.metadata.get_country(country_id).await?.is_none() {
        return Err(ApiError::BadRequest(format!("unknown country: {country_id}")));
    }
    if let Some(region_id) = region_id {
        let region = state
            .metadata
            .get_region(region_id)
            .await?
            .ok_or_else(|| ApiError::BadRequest(format!("unknown region: {region_id}")))?;
        if region.country_id != country_id {
            return Err(ApiError::BadRequest(format!(
                "region '{}' does not belong to the given country",
                region.region_name
            )));
        }
    }
    Ok(())
}

/// POST /v1/distilleries - Create a distillery.
pub async fn create_distillery(
    State(state): State<AppState>,
    Json(body): Json<CreateDistilleryRequest>,
) -> ApiResult<(StatusCode, Json<DistilleryResponse>)> {
    let name = require_name(&body.distillery_name, "distillery_name")?;
    let country_id = parse_uuid(&body.country_id, "country_id")?;
    let region_id = body
        .region_id
        .as_deref()
        .map(|id| parse_uuid(id, "region_id"))
        .transpose()?;

    resolve_geography(&state, country_id, region_id).await?;

    if state.metadata.get_distillery_by_name(&name).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "distillery with name '{name}' already exists"
        )));
    }

    let now = OffsetDateTime::now_utc();
    let row = DistilleryRow {
        distillery_id: Uuid::new_v4(),
        distillery_name: name.clone(),
        country_id,
        region_id,
        founded_year: body.founded_year,
        is_active: body.is_active,
        created_at: now,
        updated_at: now,
    };
    state.metadata.create_distillery(&row).await?;

    // Index update only after the database write committed
    state.name_index.add(&name, row.distillery_id);

    tracing::info!(distillery_id = %row.distillery_id, name = %name, "distillery created");
    Ok((StatusCode::CREATED, Json(DistilleryResponse::from_row(row)?)))
}

/// GET /v1/distilleries - Paged listing ordered by name.
pub async fn list_distilleries(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<ListDistilleriesResponse>> {
    let paging = resolve_paging(&params)?;
    let total = state.metadata.count_distilleries().await?;
    let rows = state
        .metadata
        .list_distilleries(paging.limit(), paging.offset())
        .await?;

    let distilleries = rows
        .into_iter()
        .map(DistilleryResponse::from_row)
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(Json(ListDistilleriesResponse {
        distilleries,
        page: paging.page,
        per_page: paging.per_page,
        total,
    }))
}

/// GET /v1/distilleries/search?q= - Fuzzy name search from the index.
pub async fn search_distilleries(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    let results = state
        .name_index
        .search(&params.q)
        .into_iter()
        .map(|entry| SearchHit {
            distillery_id: entry.id.to_string(),
            distillery_name: entry.name,
        })
        .collect();
    Ok(Json(SearchResponse { results }))
}

/// GET /v1/distilleries/by-name/{name} - Exact (case-insensitive) lookup.
///
/// Resolves through the index first; falls back to the database so a name
/// written before the last index reload still resolves.
pub async fn get_distillery_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<DistilleryResponse>> {
    let row = match state.name_index.try_get(&name) {
        Some(entry) => state.metadata.get_distillery(entry.id).await?,
        None => state.metadata.get_distillery_by_name(&name).await?,
    };
    let row = row.ok_or_else(|| ApiError::NotFound(format!("distillery '{name}' not found")))?;
    Ok(Json(DistilleryResponse::from_row(row)?))
}

/// GET /v1/distilleries/{distillery_id} - Get a distillery.
pub async fn get_distillery(
    State(state): State<AppState>,
    Path(distillery_id): Path<String>,
) -> ApiResult<Json<DistilleryResponse>> {
    let distillery_id = parse_uuid(&distillery_id, "distillery ID")?;
    let row = state
        .metadata
        .get_distillery(distillery_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("distillery not found".to_string()))?;
    Ok(Json(DistilleryResponse::from_row(row)?))
}

/// PUT /v1/distilleries/{distillery_id} - Update a distillery.
///
/// A rename is a remove + add against the name index; entries are never
/// mutated in place.
pub async fn update_distillery(
    State(state): State<AppState>,
    Path(distillery_id): Path<String>,
    Json(body): Json<UpdateDistilleryRequest>,
) -> ApiResult<Json<DistilleryResponse>> {
    let distillery_id = parse_uuid(&distillery_id, "distillery ID")?;
    let mut row = state
        .metadata
        .get_distillery(distillery_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("distillery not found".to_string()))?;
    let old_name = row.distillery_name.clone();

    if let Some(name) = &body.distillery_name {
        let name = require_name(name, "distillery_name")?;
        if !name.eq_ignore_ascii_case(&row.distillery_name) {
            if let Some(existing) = state.metadata.get_distillery_by_name(&name).await? {
                if existing.distillery_id != distillery_id {
                    return Err(ApiError::Conflict(format!(
                        "distillery with name '{name}' already exists"
                    )));
                }
            }
        }
        row.distillery_name = name;
    }
    if let Some(country_id) = &body.country_id {
        row.country_id = parse_uuid(country_id, "country_id")?;
    }
    if let Some(region_id) = &body.region_id {
        row.region_id = region_id
            .as_deref()
            .map(|id| parse_uuid(id, "region_id"))
            .transpose()?;
    }
    if let Some(founded_year) = &body.founded_year {
        row.founded_year = *founded_year;
    }
    if let Some(is_active) = body.is_active {
        row.is_active = is_active;
    }

    resolve_geography(&state, row.country_id, row.region_id).await?;

    row.updated_at = OffsetDateTime::now_utc();
    state.metadata.update_distillery(&row).await?;

    if row.distillery_name != old_name {
        state.name_index.remove(&old_name);
        state.name_index.add(&row.distillery_name, row.distillery_id);
    }

    Ok(Json(DistilleryResponse::from_row(row)?))
}

/// DELETE /v1/distilleries/{distillery_id} - Delete a distillery.
pub async fn delete_distillery(
    State(state): State<AppState>,
    Path(distillery_id): Path<String>,
) -> ApiResult<StatusCode> {
    let distillery_id = parse_uuid(&distillery_id, "distillery ID")?;
    let row = state
        .metadata
        .get_distillery(distillery_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("distillery not found".to_string()))?;

    state.metadata.delete_distillery(distillery_id).await?;
    state.name_index.remove(&row.distillery_name);

    tracing::info!(%distillery_id, name = %row.distillery_name, "distillery deleted");
    Ok(StatusCode::NO_CONTENT)
}
