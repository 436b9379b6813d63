use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= API Request/Response Types =============

/// One aggregation request: "find franchise X's locations in city/state/country".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LocationQuery {
    pub franchise_name: String,
    pub country: String,
    pub state: String,
    pub city: String,
}

impl LocationQuery {
    pub fn new(
        franchise_name: impl Into<String>,
        country: impl Into<String>,
        state: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            franchise_name: franchise_name.into(),
            country: country.into(),
            state: state.into(),
            city: city.into(),
        }
    }

    /// Reject queries that cannot be searched for at all
    pub fn validate(&self) -> Result<()> {
        if self.franchise_name.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "franchise_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Human-readable "city, state, country" used in messages
    pub fn place(&self) -> String {
        format!("{}, {}, {}", self.city, self.state, self.country)
    }
}

/// A located franchise instance as reported by one worker.
///
/// Serialized with capitalized keys, which is the shape clients already consume.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Location {
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Source")]
    pub source: String,
}

impl Location {
    pub fn new(
        address: impl Into<String>,
        phone: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            phone: phone.into(),
            source: source.into(),
        }
    }
}

/// Catalog entry as exposed by `GET /sources`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SourceInfo {
    pub name: String,
    pub start_url: String,
    pub step_budget: u32,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParserStats {
    pub payloads: u64,
    pub documents_accepted: u64,
    pub documents_rejected: u64,
    pub lines_scanned: u64,
    pub lines_rejected: u64,
    pub records_extracted: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub parser: ParserStats,
}

// ============= Tool Types =============

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Configuration(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::LLM(msg) => (axum::http::StatusCode::BAD_GATEWAY, msg),
            AppError::NotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (axum::http::StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
