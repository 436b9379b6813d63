//! HTTP API Handlers and Routes
//!
//! The REST and SSE surface of scout, built on the Axum web framework.
//!
//! # API Endpoints
//!
//! - `POST /get-franchise-details-stream` - Run a search; `text/event-stream` response,
//!   one JSON object per `data:` message
//! - `GET /sources` - Sources the next search will fan out to
//! - `GET /health` - Health check with parser counters
//! - `GET /api-docs/openapi.json` - OpenAPI document
//!
//! # OpenAPI Documentation
//!
//! When the `swagger-ui` feature is enabled, interactive API documentation
//! is available at `/swagger-ui/`.

/// Request handlers for all API endpoints.
pub mod handlers;
/// Router configuration and the OpenAPI document.
pub mod routes;

pub use routes::{ApiDoc, create_router};
