//! Route configuration.

use crate::handlers;
use crate::idempotency::idempotency_middleware;
use crate::state::AppState;
use axum::Router;
use axum::middleware;
use axum::routing::{delete, get};
use tower_http::trace::TraceLayer;

/// Create the application router.
///
/// The idempotency filter wraps the whole API; it passes non-mutating
/// methods through untouched and enforces the `Idempotency-Key` contract
/// on POST/PUT/DELETE. Per-request tracing is layered outermost when
/// `server.enable_tracing` is set.
pub fn create_router(state: AppState) -> Router {
    let enable_tracing = state.config.server.enable_tracing;

    let router = Router::new()
        // Health check (intentionally unfiltered for probes)
        .route("/v1/health", get(handlers::health_check))
        // Distilleries
        .route(
            "/v1/distilleries",
            get(handlers::list_distilleries).post(handlers::create_distillery),
        )
        .route("/v1/distilleries/search", get(handlers::search_distilleries))
        .route(
            "/v1/distilleries/by-name/{name}",
            get(handlers::get_distillery_by_name),
        )
        .route(
            "/v1/distilleries/{distillery_id}",
            get(handlers::get_distillery)
                .put(handlers::update_distillery)
                .delete(handlers::delete_distillery),
        )
        .route(
            "/v1/distilleries/{distillery_id}/bottles",
            get(handlers::list_bottles_for_distillery),
        )
        // Bottles
        .route(
            "/v1/bottles",
            get(handlers::list_bottles).post(handlers::create_bottle),
        )
        .route(
            "/v1/bottles/{bottle_id}",
            get(handlers::get_bottle)
                .put(handlers::update_bottle)
                .delete(handlers::delete_bottle),
        )
        // Brands
        .route(
            "/v1/brands",
            get(handlers::list_brands).post(handlers::create_brand),
        )
        .route(
            "/v1/brands/{brand_id}",
            get(handlers::get_brand)
                .put(handlers::update_brand)
                .delete(handlers::delete_brand),
        )
        // Geographic taxonomy
        .route(
            "/v1/countries",
            get(handlers::list_countries).post(handlers::create_country),
        )
        .route(
            "/v1/countries/{country_id}",
            get(handlers::get_country).delete(handlers::delete_country),
        )
        .route(
            "/v1/countries/{country_id}/regions",
            get(handlers::list_regions).post(handlers::create_region),
        )
        .route("/v1/regions/{region_id}", delete(handlers::delete_region))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            idempotency_middleware,
        ));

    let router = if enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}
