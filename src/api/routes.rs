use crate::AppState;
use crate::api::handlers::{health, locations, sources};
use crate::types::{HealthResponse, Location, LocationQuery, ParserStats, SourceInfo};
use axum::{
    Json, Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    map_response_body::MapResponseBodyLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

/// Upper bound on request bodies; a query is four short strings
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    info(title = "scout", description = "Multi-source franchise location search"),
    paths(
        locations::franchise_details_stream,
        sources::list_sources,
        health::health_check,
    ),
    components(schemas(LocationQuery, Location, SourceInfo, HealthResponse, ParserStats)),
    tags(
        (name = "search", description = "Location search"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/get-franchise-details-stream",
            post(locations::franchise_details_stream),
        )
        .route("/sources", get(sources::list_sources))
        .route("/health", get(health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(MapResponseBodyLayer::new(axum::body::Body::new))
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        )
        .with_state(state)
}
