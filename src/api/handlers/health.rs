use crate::search::parser;
use crate::types::HealthResponse;
use axum::Json;

/// Liveness plus payload parser counters since startup
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse)),
    tag = "system"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        parser: parser::metrics().snapshot(),
    })
}
