//! Aggregated insight endpoints over the medicine dataset.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::{
    CategoryClassification, CategoryDetails, CategoryShare, InsightsOverview, ManufacturerDetails,
    ManufacturerRank,
};

const DEFAULT_RANKING_LIMIT: u32 = 10;
const MAX_RANKING_LIMIT: u32 = 50;

/// List payload wrapper used by the distribution/ranking endpoints.
#[derive(Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// `GET /api/insights/overview` — dataset totals and leaders.
pub async fn overview(
    State(ctx): State<ApiContext>,
) -> Result<Json<InsightsOverview>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(repository::overview(&conn)?))
}

/// `GET /api/insights/categories/distribution`
pub async fn category_distribution(
    State(ctx): State<ApiContext>,
) -> Result<Json<DataResponse<Vec<CategoryShare>>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(DataResponse {
        data: repository::category_distribution(&conn)?,
    }))
}

/// `GET /api/insights/categories/classification`
pub async fn category_classification(
    State(ctx): State<ApiContext>,
) -> Result<Json<DataResponse<Vec<CategoryClassification>>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(DataResponse {
        data: repository::category_classification(&conn)?,
    }))
}

/// `GET /api/insights/categories/:name` — 404 for unknown names.
pub async fn category_detail(
    State(ctx): State<ApiContext>,
    Path(category_name): Path<String>,
) -> Result<Json<CategoryDetails>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(repository::category_details(&conn, &category_name)?))
}

#[derive(Deserialize)]
pub struct RankingQuery {
    pub limit: Option<u32>,
}

/// `GET /api/insights/manufacturers/ranking` — limit clamped to 1..=50.
pub async fn manufacturer_ranking(
    State(ctx): State<ApiContext>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<DataResponse<Vec<ManufacturerRank>>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RANKING_LIMIT)
        .clamp(1, MAX_RANKING_LIMIT);
    let conn = ctx.open_db()?;
    Ok(Json(DataResponse {
        data: repository::manufacturer_ranking(&conn, limit)?,
    }))
}

/// `GET /api/insights/manufacturers/:name` — 404 for unknown names.
pub async fn manufacturer_detail(
    State(ctx): State<ApiContext>,
    Path(manufacturer_name): Path<String>,
) -> Result<Json<ManufacturerDetails>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(repository::manufacturer_details(
        &conn,
        &manufacturer_name,
    )?))
}
