//! Medicine search, detail and CRUD endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::{
    Category, Manufacturer, MedicineDetail, MedicineFilter, MedicineRecord, MedicineUpdate,
    NewMedicine,
};

const DEFAULT_SEARCH_LIMIT: u32 = 50;
const DEFAULT_LIST_LIMIT: u32 = 1000;

#[derive(Deserialize)]
pub struct MedicineListQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    pub classification: Option<String>,
    pub limit: Option<u32>,
}

impl MedicineListQuery {
    fn into_parts(self) -> (MedicineFilter, u32) {
        let limit = self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        let filter = MedicineFilter {
            q: self.q,
            category: self.category,
            manufacturer: self.manufacturer,
            classification: self.classification,
        };
        (filter, limit)
    }
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub results: Vec<MedicineRecord>,
}

/// `GET /api/medicines` — filtered search, ordered by name.
pub async fn search(
    State(ctx): State<ApiContext>,
    Query(query): Query<MedicineListQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let (filter, limit) = query.into_parts();
    let conn = ctx.open_db()?;
    let results = repository::search_medicines(&conn, &filter, Some(limit))?;
    Ok(Json(SearchResponse { results }))
}

#[derive(Deserialize)]
pub struct ListAllQuery {
    pub limit: Option<u32>,
}

/// `GET /api/medicines/all` — unfiltered listing.
pub async fn list_all(
    State(ctx): State<ApiContext>,
    Query(query): Query<ListAllQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let results = repository::search_medicines(
        &conn,
        &MedicineFilter::default(),
        Some(query.limit.unwrap_or(DEFAULT_LIST_LIMIT)),
    )?;
    Ok(Json(SearchResponse { results }))
}

#[derive(Serialize)]
pub struct FilterOptionsResponse {
    pub manufacturers: Vec<Manufacturer>,
    pub categories: Vec<Category>,
    pub dosage_forms: Vec<String>,
    pub classifications: Vec<String>,
}

/// `GET /api/medicines/filters` — distinct values for the search UI.
pub async fn filter_options(
    State(ctx): State<ApiContext>,
) -> Result<Json<FilterOptionsResponse>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(FilterOptionsResponse {
        manufacturers: repository::list_manufacturers(&conn)?,
        categories: repository::list_categories(&conn)?,
        dosage_forms: repository::list_dosage_forms(&conn)?,
        classifications: repository::list_classifications(&conn)?,
    }))
}

/// `GET /api/medicines/:id` — full detail with ingredients.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(medicine_id): Path<i64>,
) -> Result<Json<MedicineDetail>, ApiError> {
    let conn = ctx.open_db()?;
    let detail = repository::get_medicine(&conn, medicine_id)?;
    Ok(Json(detail))
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub medicine_id: i64,
}

/// `POST /api/medicines` — insert a new medicine.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(new_medicine): Json<NewMedicine>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let mut conn = ctx.open_db()?;
    let medicine_id = repository::create_medicine(&mut conn, &new_medicine)?;
    tracing::info!(medicine_id, name = %new_medicine.name, "Medicine created");
    Ok(Json(CreatedResponse {
        message: "Medicine created successfully",
        medicine_id,
    }))
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// `PUT /api/medicines/:id` — partial update.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(medicine_id): Path<i64>,
    Json(update): Json<MedicineUpdate>,
) -> Result<Json<MessageResponse>, ApiError> {
    if update.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".into()));
    }
    let mut conn = ctx.open_db()?;
    repository::update_medicine(&mut conn, medicine_id, &update)?;
    Ok(Json(MessageResponse {
        message: "Medicine updated successfully",
    }))
}

/// `DELETE /api/medicines/:id` — delete with ingredient links.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(medicine_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut conn = ctx.open_db()?;
    repository::delete_medicine(&mut conn, medicine_id)?;
    tracing::info!(medicine_id, "Medicine deleted");
    Ok(Json(MessageResponse {
        message: "Medicine deleted successfully",
    }))
}
