mod common;

use axum_test::TestServer;
use common::mocks::{ScriptedCapability, ScriptedFactory};
use scout::search::WorkerTemplate;
use scout::utils::config::ScoutConfig;
use scout::{AppState, ScoutConfigManager};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

fn test_config() -> ScoutConfig {
    let mut config = ScoutConfig::default();
    config.search.drain_interval_ms = 20;
    config.workers = Some(vec![
        WorkerTemplate::new(
            "Maps",
            "Find {franchise} in {city}",
            "https://maps.example/search?q={franchise}+{city}",
            5,
        ),
        WorkerTemplate::new(
            "Yelp",
            "Find {franchise} in {city}",
            "https://yelp.example/search?find_desc={franchise}",
            3,
        ),
    ]);
    config
}

fn create_test_server(factory: ScriptedFactory) -> TestServer {
    let manager = Arc::new(ScoutConfigManager::from_config(test_config()));
    let state = AppState::with_factory(manager, Arc::new(factory));
    let app = scout::api::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

fn default_factory() -> ScriptedFactory {
    ScriptedFactory::new()
        .with(
            "Maps",
            ScriptedCapability::payload(
                r#"{"locations":[{"address":"1 Main St","phone":"555-1000"}]}"#,
            ),
        )
        .with(
            "Yelp",
            ScriptedCapability::failing("blocked").after(Duration::from_millis(10)),
        )
}

/// `data:` payloads of an SSE body, in order
fn sse_messages(body: &str) -> Vec<Value> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim()).expect("event data is JSON"))
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(default_factory());

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["parser"]["payloads"].is_u64());
}

#[tokio::test]
async fn test_sources_lists_catalog_in_order() {
    let server = create_test_server(default_factory());

    let response = server.get("/sources").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Maps", "Yelp"]);
    assert_eq!(body[1]["step_budget"], 3);
}

#[tokio::test]
async fn test_stream_emits_full_event_sequence() {
    let server = create_test_server(default_factory());

    let response = server
        .post("/get-franchise-details-stream")
        .json(&json!({
            "franchise_name": "Subway",
            "country": "USA",
            "state": "Colorado",
            "city": "Denver"
        }))
        .await;
    response.assert_status_ok();

    let messages = sse_messages(&response.text());
    assert_eq!(messages.first().unwrap()["status"], "initializing");
    assert_eq!(messages.last().unwrap(), &json!({ "status": "all_complete" }));

    let records: Vec<&Value> = messages.iter().filter(|m| m.get("location").is_some()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["location"]["Address"], "1 Main St");
    assert_eq!(records[0]["location"]["Source"], "Maps");
    assert_eq!(records[0]["source"], "Maps");

    assert!(messages.contains(&json!({
        "status": "error",
        "source": "Yelp",
        "message": "blocked"
    })));
    let completed = messages.iter().filter(|m| m["status"] == "complete").count();
    assert_eq!(completed, 2);
}

#[tokio::test]
async fn test_stream_falls_back_when_nothing_found() {
    let factory = ScriptedFactory::new()
        .with("Maps", ScriptedCapability::payload("nothing"))
        .with("Yelp", ScriptedCapability::payload(""));
    let server = create_test_server(factory);

    let response = server
        .post("/get-franchise-details-stream")
        .json(&json!({
            "franchise_name": "Subway",
            "country": "USA",
            "state": "Colorado",
            "city": "Denver"
        }))
        .await;

    let messages = sse_messages(&response.text());
    let fallback = &messages[messages.len() - 2];
    assert_eq!(fallback["source"], "System");
    assert_eq!(
        fallback["location"]["Address"],
        "No specific Subway locations found in Denver, Colorado, USA"
    );
    assert_eq!(fallback["location"]["Phone"], "N/A");
}

#[tokio::test]
async fn test_stream_reports_fatal_error_when_no_worker_starts() {
    let server = create_test_server(ScriptedFactory::new());

    let response = server
        .post("/get-franchise-details-stream")
        .json(&json!({
            "franchise_name": "Subway",
            "country": "USA",
            "state": "Colorado",
            "city": "Denver"
        }))
        .await;
    response.assert_status_ok();

    let messages = sse_messages(&response.text());
    assert_eq!(messages.len(), 2);
    assert_eq!(
        messages[1],
        json!({ "error": "Failed to create any search agents" })
    );
}

#[tokio::test]
async fn test_empty_franchise_is_rejected() {
    let server = create_test_server(default_factory());

    let response = server
        .post("/get-franchise-details-stream")
        .json(&json!({
            "franchise_name": "   ",
            "country": "USA",
            "state": "Colorado",
            "city": "Denver"
        }))
        .await;
    response.assert_status_bad_request();

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("franchise_name"));
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let server = create_test_server(default_factory());

    let response = server.get("/api-docs/openapi.json").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let paths = body["paths"].as_object().unwrap();
    assert!(paths.contains_key("/get-franchise-details-stream"));
    assert!(paths.contains_key("/sources"));
    assert!(paths.contains_key("/health"));

    // Documented event keys match what the stream actually sends
    let description = body["paths"]["/get-franchise-details-stream"]["post"]["description"]
        .as_str()
        .unwrap_or_default();
    assert!(description.contains("`status`"));
    assert!(description.contains("`all_complete`"));
    assert!(!description.contains("`type`"));
}
