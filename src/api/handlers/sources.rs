use crate::{AppState, types::SourceInfo};
use axum::{Json, extract::State};

/// Sources the next search fans out to, in catalog order
#[utoipa::path(
    get,
    path = "/sources",
    responses((status = 200, description = "Configured sources", body = Vec<SourceInfo>)),
    tag = "search"
)]
pub async fn list_sources(State(state): State<AppState>) -> Json<Vec<SourceInfo>> {
    Json(state.config_manager.config().catalog().sources())
}
