//! TOML-based configuration for scout
//!
//! Server settings, search tuning, named LLM providers and the optional worker
//! catalog are declared in `scout.toml`. Secrets stay in the environment and are
//! referenced by variable name.
//!
//! # Hot Reloading
//!
//! Use [`ScoutConfigManager`] for thread-safe access to the current configuration.
//! Each search takes a snapshot when it starts, so a reload never changes a
//! search that is already running.

use crate::llm::Provider;
use crate::search::{Catalog, SearchSettings, WorkerTemplate};
use crate::workers::browser::BrowsingSettings;
use arc_swap::ArcSwap;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Root configuration structure loaded from scout.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub search: SearchConfig,

    /// Named LLM provider configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub agent: AgentConfig,

    /// Worker catalog; the built-in sources are used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<Vec<WorkerTemplate>>,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

// ============= Search Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// How long the drain loop waits for an event before re-checking termination
    #[serde(default = "default_drain_interval_ms")]
    pub drain_interval_ms: u64,

    /// Abort in-flight workers when the client goes away
    #[serde(default = "default_true")]
    pub cancel_on_disconnect: bool,

    /// Characters kept from one fetched page or tool result
    #[serde(default = "default_max_page_chars")]
    pub max_page_chars: usize,

    /// Interval between SSE keep-alive comments
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,
}

fn default_drain_interval_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_max_page_chars() -> usize {
    12_000
}

fn default_keep_alive_secs() -> u64 {
    15
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            drain_interval_ms: default_drain_interval_ms(),
            cancel_on_disconnect: true,
            max_page_chars: default_max_page_chars(),
            keep_alive_secs: default_keep_alive_secs(),
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        default_model: String,
    },
    OpenAI {
        /// Environment variable containing API key
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
        default_model: String,
    },
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

impl ProviderConfig {
    /// Resolve into a runtime [`Provider`], reading secrets from the environment
    pub fn to_provider(&self, model_override: Option<&str>) -> Result<Provider, ConfigError> {
        match self {
            ProviderConfig::Ollama {
                base_url,
                default_model,
            } => Ok(Provider::Ollama {
                base_url: base_url.clone(),
                model: model_override.unwrap_or(default_model).to_string(),
            }),
            ProviderConfig::OpenAI {
                api_key_env,
                api_base,
                default_model,
            } => {
                let api_key = std::env::var(api_key_env)
                    .map_err(|_| ConfigError::MissingEnvVar(api_key_env.clone()))?;
                Ok(Provider::OpenAI {
                    api_key,
                    api_base: api_base.clone(),
                    model: model_override.unwrap_or(default_model).to_string(),
                })
            }
        }
    }
}

// ============= Agent Configuration =============

/// Defaults for the browsing agent behind every worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Provider used by workers that do not name one
    #[serde(default = "default_agent_provider")]
    pub provider: String,

    /// Overrides the provider's default model
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_secs: u64,
}

fn default_agent_provider() -> String {
    "ollama".to_string()
}

fn default_tool_timeout() -> u64 {
    30
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            provider: default_agent_provider(),
            model: None,
            tool_timeout_secs: default_tool_timeout(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Configuration warnings that don't prevent operation but may indicate issues
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub kind: ConfigWarningKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarningKind {
    UnusedProvider,
    NoActiveWorkers,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Provider '{0}' referenced by '{1}' does not exist")]
    MissingProvider(String, String),

    #[error("Watch error: {0}")]
    WatchError(#[from] notify::Error),
}

impl From<ConfigError> for crate::types::AppError {
    fn from(err: ConfigError) -> Self {
        crate::types::AppError::Configuration(err.to_string())
    }
}

impl ScoutConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ScoutConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate provider references, secrets and the worker catalog
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.drain_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "search.drain_interval_ms must be greater than zero".to_string(),
            ));
        }

        for provider in self.providers.values() {
            if let ProviderConfig::OpenAI { api_key_env, .. } = provider {
                self.validate_env_var(api_key_env)?;
            }
        }

        if !self.providers.contains_key(&self.agent.provider) {
            return Err(ConfigError::MissingProvider(
                self.agent.provider.clone(),
                "agent".to_string(),
            ));
        }

        let catalog = self.catalog();
        let mut names = HashSet::new();
        for worker in catalog.templates() {
            if worker.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "Worker name must not be empty".to_string(),
                ));
            }
            if !names.insert(worker.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Duplicate worker name '{}'",
                    worker.name
                )));
            }
            if worker.step_budget == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "Worker '{}' must have a step_budget of at least 1",
                    worker.name
                )));
            }
            if let Some(ref provider) = worker.provider
                && !self.providers.contains_key(provider)
            {
                return Err(ConfigError::MissingProvider(
                    provider.clone(),
                    format!("worker '{}'", worker.name),
                ));
            }
        }

        Ok(())
    }

    /// Validate configuration with warnings for unused or inert items
    pub fn validate_with_warnings(&self) -> Result<Vec<ConfigWarning>, ConfigError> {
        self.validate()?;

        let mut warnings = self.check_unused_providers();

        if self.catalog().templates().iter().all(|t| !t.enabled) {
            warnings.push(ConfigWarning {
                kind: ConfigWarningKind::NoActiveWorkers,
                message: "No enabled workers; every search will end with a fatal error"
                    .to_string(),
            });
        }

        Ok(warnings)
    }

    fn check_unused_providers(&self) -> Vec<ConfigWarning> {
        let catalog = self.catalog();
        let mut referenced: HashSet<&str> = catalog
            .templates()
            .iter()
            .filter_map(|t| t.provider.as_deref())
            .collect();
        referenced.insert(self.agent.provider.as_str());

        let mut unused: Vec<&String> = self
            .providers
            .keys()
            .filter(|name| !referenced.contains(name.as_str()))
            .collect();
        unused.sort();

        unused
            .into_iter()
            .map(|name| ConfigWarning {
                kind: ConfigWarningKind::UnusedProvider,
                message: format!(
                    "Provider '{}' is defined but not used by the agent or any worker",
                    name
                ),
            })
            .collect()
    }

    fn validate_env_var(&self, name: &str) -> Result<(), ConfigError> {
        std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
        Ok(())
    }

    /// Get provider by name
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.get(name)
    }

    /// The configured worker catalog, or the built-in one
    pub fn catalog(&self) -> Catalog {
        match &self.workers {
            Some(workers) => Catalog::new(workers.clone()),
            None => Catalog::builtin(),
        }
    }

    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            drain_interval: Duration::from_millis(self.search.drain_interval_ms),
            cancel_on_disconnect: self.search.cancel_on_disconnect,
        }
    }

    pub fn browsing_settings(&self) -> BrowsingSettings {
        BrowsingSettings {
            max_observation_chars: self.search.max_page_chars,
            tool_timeout: Duration::from_secs(self.agent.tool_timeout_secs),
        }
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.search.keep_alive_secs)
    }
}

// ============= Hot Reloading Configuration Manager =============

/// Thread-safe configuration manager with hot reloading support
pub struct ScoutConfigManager {
    config: Arc<ArcSwap<ScoutConfig>>,
    config_path: PathBuf,
    watcher: RwLock<Option<RecommendedWatcher>>,
}

impl ScoutConfigManager {
    /// Create a new configuration manager and load the initial config
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        // Absolute path for reliable file watching
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(ConfigError::ReadError)?
                .join(path)
        };

        let config = ScoutConfig::load(&path)?;

        Ok(Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: path,
            watcher: RwLock::new(None),
        })
    }

    /// Create a config manager directly from a config (useful for testing)
    /// This won't have file watching capabilities.
    pub fn from_config(config: ScoutConfig) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: PathBuf::from("scout.toml"),
            watcher: RwLock::new(None),
        }
    }

    /// Get the current configuration (lockless read)
    pub fn config(&self) -> Arc<ScoutConfig> {
        self.config.load_full()
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Manually reload the configuration from disk
    pub fn reload(&self) -> Result<(), ConfigError> {
        info!("Reloading configuration from {:?}", self.config_path);

        let new_config = ScoutConfig::load(&self.config_path)?;
        self.config.store(Arc::new(new_config));

        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Start watching for configuration file changes
    pub fn start_watching(&self) -> Result<(), ConfigError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();

        let config_path = self.config_path.clone();
        let config_arc = Arc::clone(&self.config);
        let file_name = config_path.file_name().map(|n| n.to_os_string());

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    let touches_config = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if touches_config && (event.kind.is_modify() || event.kind.is_create()) {
                        let _ = tx.send(());
                    }
                }
                Err(e) => {
                    error!("Config watcher error: {:?}", e);
                }
            }
        })?;

        // Editors often replace the file, so watch its directory
        if let Some(parent) = self.config_path.parent() {
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
        }

        *self.watcher.write() = Some(watcher);

        tokio::spawn(async move {
            let debounce = Duration::from_millis(500);
            let mut last_reload: Option<std::time::Instant> = None;

            while rx.recv().await.is_some() {
                if last_reload.is_some_and(|t| t.elapsed() < debounce) {
                    continue;
                }

                // Let the writer finish
                tokio::time::sleep(Duration::from_millis(100)).await;

                match ScoutConfig::load(&config_path) {
                    Ok(new_config) => {
                        config_arc.store(Arc::new(new_config));
                        info!("Configuration hot-reloaded successfully");
                        last_reload = Some(std::time::Instant::now());
                    }
                    Err(e) => {
                        warn!("Failed to hot-reload config: {}. Keeping previous config.", e);
                    }
                }
            }
        });

        info!("Configuration hot-reload watcher started");
        Ok(())
    }

    /// Stop watching for configuration changes
    pub fn stop_watching(&self) {
        *self.watcher.write() = None;
        info!("Configuration hot-reload watcher stopped");
    }
}

impl Clone for ScoutConfigManager {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            config_path: self.config_path.clone(),
            watcher: RwLock::new(None), // Watcher is not cloned
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> &'static str {
        r#"
[server]
host = "0.0.0.0"
port = 9000
log_level = "debug"

[providers.local]
type = "ollama"
default_model = "llama3.1"

[agent]
provider = "local"
"#
    }

    #[test]
    fn test_parse_config() {
        let config = ScoutConfig::parse(base_config()).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.agent.provider, "local");
        assert!(config.workers.is_none());
        assert_eq!(config.catalog().len(), 5);
    }

    #[test]
    fn test_defaults() {
        let config = ScoutConfig::parse(base_config()).unwrap();

        assert_eq!(config.search.drain_interval_ms, 1000);
        assert!(config.search.cancel_on_disconnect);
        assert_eq!(config.search.max_page_chars, 12_000);
        assert_eq!(config.keep_alive(), Duration::from_secs(15));
        assert_eq!(config.search_settings().drain_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_missing_agent_provider() {
        let toml = r#"
[providers.local]
type = "ollama"
default_model = "llama3.1"

[agent]
provider = "remote"
"#;
        let result = ScoutConfig::parse(toml);
        assert!(matches!(result, Err(ConfigError::MissingProvider(p, _)) if p == "remote"));
    }

    #[test]
    fn test_worker_provider_must_exist() {
        let toml = format!(
            "{}\n{}",
            base_config(),
            r#"
[[workers]]
name = "Yelp"
task = "find {franchise}"
start_url = "https://www.yelp.com"
provider = "nope"
"#
        );
        let result = ScoutConfig::parse(&toml);
        assert!(matches!(result, Err(ConfigError::MissingProvider(p, _)) if p == "nope"));
    }

    #[test]
    fn test_duplicate_worker_names_rejected() {
        let toml = format!(
            "{}\n{}",
            base_config(),
            r#"
[[workers]]
name = "Yelp"
task = "a"
start_url = "https://a"

[[workers]]
name = "Yelp"
task = "b"
start_url = "https://b"
"#
        );
        assert!(matches!(
            ScoutConfig::parse(&toml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_zero_step_budget_rejected() {
        let toml = format!(
            "{}\n{}",
            base_config(),
            r#"
[[workers]]
name = "Yelp"
task = "a"
start_url = "https://a"
step_budget = 0
"#
        );
        assert!(matches!(
            ScoutConfig::parse(&toml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_openai_requires_env_var() {
        let toml = r#"
[providers.cloud]
type = "openai"
api_key_env = "SCOUT_TEST_UNSET_OPENAI_KEY"
default_model = "gpt-4.1"

[agent]
provider = "cloud"
"#;
        let result = ScoutConfig::parse(toml);
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "SCOUT_TEST_UNSET_OPENAI_KEY")
        );
    }

    #[test]
    fn test_empty_worker_list_warns() {
        let toml = format!("workers = []\n{}", base_config());
        let config = ScoutConfig::parse(&toml).unwrap();

        assert!(config.catalog().is_empty());
        let warnings = config.validate_with_warnings().unwrap();
        assert!(
            warnings
                .iter()
                .any(|w| w.kind == ConfigWarningKind::NoActiveWorkers)
        );
    }

    #[test]
    fn test_unused_provider_warning() {
        let toml = format!(
            "{}\n{}",
            base_config(),
            r#"
[providers.spare]
type = "ollama"
default_model = "qwen2.5"
"#
        );
        let config = ScoutConfig::parse(&toml).unwrap();
        let warnings = config.validate_with_warnings().unwrap();

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, ConfigWarningKind::UnusedProvider);
        assert!(warnings[0].message.contains("spare"));
    }

    #[test]
    fn test_provider_model_override() {
        let config = ScoutConfig::parse(base_config()).unwrap();
        let provider = config
            .get_provider("local")
            .unwrap()
            .to_provider(Some("qwen2.5"))
            .unwrap();
        assert_eq!(provider.model(), "qwen2.5");
    }

    #[test]
    fn test_config_manager_from_config() {
        let config = ScoutConfig::parse(base_config()).unwrap();
        let manager = ScoutConfigManager::from_config(config);

        assert_eq!(manager.config().server.port, 9000);
    }
}
