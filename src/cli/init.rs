//! Init command implementation
//!
//! Writes a starter `scout.toml` and `.env.example`.

use super::output::Output;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug, PartialEq)]
pub enum InitResult {
    Success,
    /// scout.toml already exists and `force` was not given
    AlreadyExists,
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// LLM provider to configure (ollama or openai)
    pub provider: String,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing scout");

    let base_path = &config.path;
    if let Err(e) = fs::create_dir_all(base_path) {
        output.error(&format!("Failed to create {}: {}", base_path.display(), e));
        return InitResult::Error(e.to_string());
    }

    let config_path = base_path.join("scout.toml");
    if config_path.exists() && !config.force {
        output.warning("scout.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    let files = [
        ("config", "scout.toml", generate_scout_toml(&config.provider)),
        ("env", ".env.example", generate_env_example()),
    ];

    for (kind, name, content) in &files {
        if let Err(e) = write_file(&base_path.join(name), content, config.force) {
            output.error(&format!("Failed to create {}: {}", name, e));
            return InitResult::Error(e.to_string());
        }
        output.created(kind, name);
    }

    let gitignore_path = base_path.join(".gitignore");
    if gitignore_path.exists() {
        output.skipped(".gitignore", "already exists");
    } else if let Err(e) = write_file(&gitignore_path, GITIGNORE, false) {
        output.warning(&format!("Failed to create .gitignore: {}", e));
    } else {
        output.created("file", ".gitignore");
    }

    output.complete("scout initialized");

    output.header("Next Steps");
    output.command("cp .env.example .env");
    if config.provider == "openai" {
        output.command("# Edit .env and set OPENAI_API_KEY");
    } else {
        output.command("ollama pull llama3.1");
    }
    output.command("scout-server");
    output.hint("Stream results with POST /get-franchise-details-stream");

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

fn generate_scout_toml(provider: &str) -> String {
    let (provider_name, provider_section) = if provider == "openai" {
        (
            "openai",
            r#"# OpenAI API (set OPENAI_API_KEY in .env)
[providers.openai]
type = "openai"
api_key_env = "OPENAI_API_KEY"
api_base = "https://api.openai.com/v1"
default_model = "gpt-4.1-mini"
"#,
        )
    } else {
        (
            "ollama",
            r#"# Local Ollama server
[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"
default_model = "llama3.1"
"#,
        )
    };

    format!(
        r#"# scout configuration
# ===================

[server]
host = "127.0.0.1"
port = 8000
log_level = "info"

[search]
# How often the drain loop re-checks for finished workers
drain_interval_ms = 1000
# Abort running workers when the client disconnects
cancel_on_disconnect = true
# Characters kept from one fetched page
max_page_chars = 12000
keep_alive_secs = 15

{provider_section}
[agent]
provider = "{provider_name}"
# model = "override-the-provider-default"
tool_timeout_secs = 30

# Without a [[workers]] list the built-in sources are used
# (Google Maps, Official Website, Yelp, Yellow Pages, Other Websites).
# Placeholders: {{franchise}} {{city}} {{state}} {{country}}
#
# [[workers]]
# name = "Yelp"
# task = "Find {{franchise}} locations in {{city}}, {{state}} on Yelp ..."
# start_url = "https://www.yelp.com/search?find_desc={{franchise}}&find_loc={{city}}+{{state}}"
# step_budget = 10
"#
    )
}

fn generate_env_example() -> String {
    r#"# scout environment variables
# Copy this file to .env and fill in the values.

# Optional: log filter (overrides server.log_level)
RUST_LOG=info,scout=debug

# Required when an openai provider is configured
# OPENAI_API_KEY=sk-...
"#
    .to_string()
}

const GITIGNORE: &str = r#"# Environment
.env
.env.local

# Rust
/target/
"#;
