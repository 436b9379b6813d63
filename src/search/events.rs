//! Events flowing through one search.
//!
//! Runners submit [`RunnerMessage`]s into a shared channel; the coordinator
//! turns them into the outgoing [`SearchEvent`] sequence. The wire shape of an
//! event is one JSON object, produced by [`SearchEvent::to_json`].

use crate::types::Location;
use serde_json::{Value, json};

/// What a runner can tell the coordinator. Records arrive as candidates and
/// are only forwarded after the coordinator's dedup check.
#[derive(Debug, Clone, PartialEq)]
pub enum RunnerMessage {
    Started { worker: String },
    Candidate { worker: String, record: Location },
    Failed { worker: String, message: String },
    Finished { worker: String },
}

/// One event on the caller-facing stream
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    Init { message: String },
    Progress { source: String, message: String },
    RecordFound { location: Location, source: String },
    WorkerError { source: String, message: String },
    WorkerDone { source: String },
    Fallback { location: Location },
    AllDone,
    FatalError { message: String },
}

/// Fallback record label
pub const SYSTEM_SOURCE: &str = "System";

impl SearchEvent {
    pub fn init() -> Self {
        SearchEvent::Init {
            message: "Starting search on multiple sources...".to_string(),
        }
    }

    pub fn progress(source: &str) -> Self {
        SearchEvent::Progress {
            source: source.to_string(),
            message: format!("Searching {}...", source),
        }
    }

    /// Forwarded record; the event's `source` is the record's own label
    pub fn record(location: Location) -> Self {
        let source = location.source.clone();
        SearchEvent::RecordFound { location, source }
    }

    /// Synthetic "nothing found" record
    pub fn fallback(franchise: &str, place: &str) -> Self {
        SearchEvent::Fallback {
            location: Location::new(
                format!("No specific {} locations found in {}", franchise, place),
                "N/A",
                SYSTEM_SOURCE,
            ),
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        SearchEvent::FatalError {
            message: message.into(),
        }
    }

    /// Short, stable name of the variant (used for logging and CLI output)
    pub fn kind(&self) -> &'static str {
        match self {
            SearchEvent::Init { .. } => "init",
            SearchEvent::Progress { .. } => "progress",
            SearchEvent::RecordFound { .. } => "record",
            SearchEvent::WorkerError { .. } => "worker_error",
            SearchEvent::WorkerDone { .. } => "worker_done",
            SearchEvent::Fallback { .. } => "fallback",
            SearchEvent::AllDone => "all_done",
            SearchEvent::FatalError { .. } => "fatal",
        }
    }

    /// Whether no event can follow this one
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchEvent::AllDone | SearchEvent::FatalError { .. })
    }

    /// Wire representation
    pub fn to_json(&self) -> Value {
        match self {
            SearchEvent::Init { message } => json!({
                "status": "initializing",
                "message": message,
            }),
            SearchEvent::Progress { source, message } => json!({
                "status": "progress",
                "source": source,
                "message": message,
            }),
            SearchEvent::RecordFound { location, source } => json!({
                "location": location,
                "source": source,
            }),
            SearchEvent::WorkerError { source, message } => json!({
                "status": "error",
                "source": source,
                "message": message,
            }),
            SearchEvent::WorkerDone { source } => json!({
                "status": "complete",
                "source": source,
            }),
            SearchEvent::Fallback { location } => json!({
                "location": location,
                "source": SYSTEM_SOURCE,
            }),
            SearchEvent::AllDone => json!({ "status": "all_complete" }),
            SearchEvent::FatalError { message } => json!({ "error": message }),
        }
    }
}

impl serde::Serialize for SearchEvent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
