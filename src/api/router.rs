//! API router.
//!
//! Returns a composable `Router` with the medicine, insights and
//! export endpoints under `/api/` plus the `/health` check. CORS is
//! wide open since the service fronts a browser dashboard.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the API router with all routes and the CORS layer.
pub fn api_router(ctx: ApiContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let medicines = Router::new()
        .route(
            "/",
            get(endpoints::medicines::search).post(endpoints::medicines::create),
        )
        .route("/filters", get(endpoints::medicines::filter_options))
        .route("/all", get(endpoints::medicines::list_all))
        .route(
            "/:id",
            get(endpoints::medicines::detail)
                .put(endpoints::medicines::update)
                .delete(endpoints::medicines::remove),
        );

    let insights = Router::new()
        .route("/overview", get(endpoints::insights::overview))
        .route(
            "/categories/distribution",
            get(endpoints::insights::category_distribution),
        )
        .route(
            "/categories/classification",
            get(endpoints::insights::category_classification),
        )
        .route("/categories/:name", get(endpoints::insights::category_detail))
        .route(
            "/manufacturers/ranking",
            get(endpoints::insights::manufacturer_ranking),
        )
        .route(
            "/manufacturers/:name",
            get(endpoints::insights::manufacturer_detail),
        );

    let export = Router::new().route("/pdf", post(endpoints::export::pdf));

    Router::new()
        .route("/health", get(endpoints::health::check))
        .nest("/api/medicines", medicines)
        .nest("/api/insights", insights)
        .nest("/api/export", export)
        .layer(cors)
        .with_state(ctx)
}
