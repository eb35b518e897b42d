//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::config;
use crate::db::repository;

#[derive(Serialize)]
pub struct HealthResponse {
    pub api: &'static str,
    pub version: &'static str,
    pub database: DatabaseHealth,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medicines: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `GET /health` — service liveness plus datastore connectivity.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let database = match ctx
        .open_db()
        .and_then(|conn| repository::entity_counts(&conn))
    {
        Ok((medicines, manufacturers, categories)) => DatabaseHealth {
            status: "connected",
            medicines: Some(medicines),
            manufacturers: Some(manufacturers),
            categories: Some(categories),
            message: None,
        },
        Err(e) => DatabaseHealth {
            status: "error",
            medicines: None,
            manufacturers: None,
            categories: None,
            message: Some(e.to_string()),
        },
    };

    Json(HealthResponse {
        api: "healthy",
        version: config::APP_VERSION,
        database,
    })
}
