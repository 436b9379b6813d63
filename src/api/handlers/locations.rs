use crate::{AppState, types::{LocationQuery, Result}};
use axum::{
    Json,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt};
use std::convert::Infallible;
use tracing::info;

/// Stream franchise locations from every configured source
///
/// Each `data:` message is one JSON object. Lifecycle events carry a `status`
/// of `initializing`, `progress`, `error`, `complete` or `all_complete`; found
/// locations carry `location` and `source`; a fatal failure is `{"error": ...}`.
#[utoipa::path(
    post,
    path = "/get-franchise-details-stream",
    request_body = LocationQuery,
    responses(
        (status = 200, description = "Server-sent event stream of search events", body = String, content_type = "text/event-stream"),
        (status = 400, description = "Invalid input")
    ),
    tag = "search"
)]
pub async fn franchise_details_stream(
    State(state): State<AppState>,
    Json(query): Json<LocationQuery>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    query.validate()?;

    // One snapshot for the whole search; hot reloads apply to the next one
    let config = state.config_manager.config();
    info!(franchise = %query.franchise_name, place = %query.place(), "Search requested");

    let events = state
        .coordinator(&config)
        .search(query)
        .map(|event| Ok(Event::default().data(event.to_json().to_string())));

    Ok(Sse::new(events).keep_alive(KeepAlive::new().interval(config.keep_alive())))
}
