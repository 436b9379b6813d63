use scout::LocationQuery;
use scout::utils::config::{ConfigError, ScoutConfig, ScoutConfigManager};
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"
[server]
port = 8123

[search]
drain_interval_ms = 250

[providers.local]
type = "ollama"
base_url = "http://localhost:11434"
default_model = "llama3.1"

[agent]
provider = "local"

[[workers]]
name = "Directory"
task = "List every {franchise} in {city}, {state}"
start_url = "https://directory.example/find?what={franchise}&where={city}"
step_budget = 4

[[workers]]
name = "Archive"
task = "Search the archive for {franchise}"
start_url = "https://archive.example/?q={franchise}"
enabled = false
"#;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("scout.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, CONFIG);

    let config = ScoutConfig::load(&path).unwrap();

    assert_eq!(config.server.port, 8123);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.search.drain_interval_ms, 250);
    assert_eq!(config.catalog().len(), 2);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();

    let err = ScoutConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(_)));
}

#[test]
fn test_invalid_toml() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[server\nport = ");

    let err = ScoutConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}

#[test]
fn test_workers_render_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, CONFIG);
    let config = ScoutConfig::load(&path).unwrap();

    let query = LocationQuery::new("Taco Bell", "USA", "New York", "New York City");
    let specs = config.catalog().specs_for(&query);

    // Disabled sources are skipped
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0].name, "Directory");
    assert_eq!(specs[0].task_description, "List every Taco Bell in New York City, New York");
    assert_eq!(
        specs[0].start_url,
        "https://directory.example/find?what=Taco+Bell&where=New+York+City"
    );
    assert_eq!(specs[0].step_budget, 4);
}

#[test]
fn test_manager_reload_picks_up_changes() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, CONFIG);

    let manager = ScoutConfigManager::new(&path).unwrap();
    let before = manager.config();
    assert_eq!(before.search.drain_interval_ms, 250);

    fs::write(&path, CONFIG.replace("drain_interval_ms = 250", "drain_interval_ms = 500")).unwrap();
    manager.reload().unwrap();

    assert_eq!(manager.config().search.drain_interval_ms, 500);
    // Snapshots taken earlier are unaffected
    assert_eq!(before.search.drain_interval_ms, 250);
}

#[test]
fn test_failed_reload_keeps_previous_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, CONFIG);
    let manager = ScoutConfigManager::new(&path).unwrap();

    fs::write(&path, CONFIG.replace("provider = \"local\"", "provider = \"missing\"")).unwrap();

    assert!(matches!(
        manager.reload(),
        Err(ConfigError::MissingProvider(..))
    ));
    assert_eq!(manager.config().agent.provider, "local");
}

#[test]
fn test_unused_provider_warning() {
    let content = format!(
        "{}\n[providers.spare]\ntype = \"ollama\"\ndefault_model = \"qwen2.5\"\n",
        CONFIG
    );
    let config = ScoutConfig::parse(&content).unwrap();

    let warnings = config.validate_with_warnings().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("spare"));
}
