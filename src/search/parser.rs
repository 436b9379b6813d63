//! Worker payload parsing
//!
//! Worker output is not contractually structured, so extraction is a
//! best-effort, total function with an ordered fallback chain:
//!
//! 1. **Document**: a payload that starts with `{` is parsed as one JSON object
//!    carrying a `locations` list of `{address, phone, source}` objects.
//! 2. **Lines**: otherwise (or when the document tier yields no `locations`
//!    list) every line mentioning both `"address"` and `"phone"` is parsed on
//!    its own as a JSON object with case-insensitive keys.
//!
//! Missing fields default to the empty string and a missing `source` defaults
//! to the originating worker's name. Malformed input never escapes as an error;
//! it is counted in [`ParserMetrics`] and otherwise dropped.

use crate::types::{Location, ParserStats};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counters for the parser's silent-drop policy
#[derive(Debug, Default)]
pub struct ParserMetrics {
    payloads: AtomicU64,
    documents_accepted: AtomicU64,
    documents_rejected: AtomicU64,
    lines_scanned: AtomicU64,
    lines_rejected: AtomicU64,
    records_extracted: AtomicU64,
}

impl ParserMetrics {
    pub const fn new() -> Self {
        Self {
            payloads: AtomicU64::new(0),
            documents_accepted: AtomicU64::new(0),
            documents_rejected: AtomicU64::new(0),
            lines_scanned: AtomicU64::new(0),
            lines_rejected: AtomicU64::new(0),
            records_extracted: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> ParserStats {
        ParserStats {
            payloads: self.payloads.load(Ordering::Relaxed),
            documents_accepted: self.documents_accepted.load(Ordering::Relaxed),
            documents_rejected: self.documents_rejected.load(Ordering::Relaxed),
            lines_scanned: self.lines_scanned.load(Ordering::Relaxed),
            lines_rejected: self.lines_rejected.load(Ordering::Relaxed),
            records_extracted: self.records_extracted.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }
}

static METRICS: ParserMetrics = ParserMetrics::new();

/// Global parser counters
pub fn metrics() -> &'static ParserMetrics {
    &METRICS
}

/// Extract location records from one worker's terminal payload
pub fn parse_payload(payload: &str, worker_name: &str) -> Vec<Location> {
    parse_with_metrics(payload, worker_name, &METRICS)
}

/// Same as [`parse_payload`], recording into the given counters
pub fn parse_with_metrics(
    payload: &str,
    worker_name: &str,
    metrics: &ParserMetrics,
) -> Vec<Location> {
    ParserMetrics::bump(&metrics.payloads, 1);

    let records = match parse_document(payload, worker_name) {
        Some(records) => {
            ParserMetrics::bump(&metrics.documents_accepted, 1);
            records
        }
        None => {
            if payload.trim_start().starts_with('{') {
                ParserMetrics::bump(&metrics.documents_rejected, 1);
            }
            parse_lines(payload, worker_name, metrics)
        }
    };

    ParserMetrics::bump(&metrics.records_extracted, records.len() as u64);
    tracing::debug!(
        worker = worker_name,
        records = records.len(),
        "Parsed worker payload"
    );
    records
}

/// Document tier; `None` means "fall through to the line tier"
fn parse_document(payload: &str, worker_name: &str) -> Option<Vec<Location>> {
    let trimmed = payload.trim();
    if !trimmed.starts_with('{') {
        return None;
    }

    let document: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(worker = worker_name, "Payload is not a JSON document: {}", e);
            return None;
        }
    };

    let locations = document.get("locations")?.as_array()?;

    Some(
        locations
            .iter()
            .filter_map(Value::as_object)
            .map(|obj| Location {
                address: field(obj, "address"),
                phone: field(obj, "phone"),
                source: source_field(obj, worker_name),
            })
            .collect(),
    )
}

/// Line tier: one JSON object per matching line, failures skipped
fn parse_lines(payload: &str, worker_name: &str, metrics: &ParserMetrics) -> Vec<Location> {
    let mut records = Vec::new();

    for line in payload.lines() {
        let lowered = line.to_lowercase();
        if !(lowered.contains("\"address\"") && lowered.contains("\"phone\"")) {
            continue;
        }
        ParserMetrics::bump(&metrics.lines_scanned, 1);

        let candidate = line.trim().trim_end_matches(',');
        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(obj)) => records.push(Location {
                address: field(&obj, "address"),
                phone: field(&obj, "phone"),
                source: source_field(&obj, worker_name),
            }),
            Ok(_) => ParserMetrics::bump(&metrics.lines_rejected, 1),
            Err(e) => {
                ParserMetrics::bump(&metrics.lines_rejected, 1);
                tracing::debug!(worker = worker_name, "Skipping malformed line: {}", e);
            }
        }
    }

    records
}

/// Look up `key` case-insensitively, preferring the exact lowercase spelling
fn lookup<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).or_else(|| {
        obj.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn field(obj: &Map<String, Value>, key: &str) -> String {
    lookup(obj, key).map(value_text).unwrap_or_default()
}

fn source_field(obj: &Map<String, Value>, worker_name: &str) -> String {
    match lookup(obj, "source") {
        Some(Value::Null) | None => worker_name.to_string(),
        Some(value) => value_text(value),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
