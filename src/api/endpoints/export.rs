//! PDF export endpoint: search → summarize → render.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::MedicineFilter;
use crate::report::{render_report, ReportOptions};
use crate::stats;

fn default_include_details() -> bool {
    true
}

#[derive(Deserialize)]
pub struct ExportQuery {
    #[serde(default = "default_include_details")]
    pub include_details: bool,
}

/// `POST /api/export/pdf` — body is the filter set; responds with the
/// rendered report as a PDF attachment.
pub async fn pdf(
    State(ctx): State<ApiContext>,
    Query(query): Query<ExportQuery>,
    Json(filter): Json<MedicineFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let records = {
        let conn = ctx.open_db()?;
        repository::search_medicines(&conn, &filter, None)?
    };

    let summary = stats::summarize(&records, &filter);
    let report = render_report(
        &records,
        &summary,
        &ReportOptions {
            include_details: query.include_details,
        },
    )?;

    tracing::info!(
        records = records.len(),
        filename = %report.filename,
        "Export report rendered"
    );

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", report.filename),
        ),
    ];
    Ok((headers, report.bytes))
}
