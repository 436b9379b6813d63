//! # scout - multi-source franchise location search
//!
//! scout answers "where are franchise X's locations in city/state/country?" by
//! fanning the question out to several slow, unreliable browsing agents at once
//! and streaming every distinct location they report, as soon as it arrives.
//!
//! ## Overview
//!
//! scout can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `scout-server` binary
//! 2. **As a library** - Embed the aggregation engine in your own Rust project
//!
//! ### Library Example
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use scout::{Catalog, LocationQuery, SearchCoordinator, SearchSettings};
//!
//! let coordinator = SearchCoordinator::new(Catalog::builtin(), factory, SearchSettings::default());
//! let mut events = coordinator.search(LocationQuery::new("Subway", "USA", "CO", "Denver"));
//! while let Some(event) = events.next().await {
//!     println!("{}", event.to_json());
//! }
//! ```
//!
//! Anything implementing [`workers::CapabilityFactory`] can stand behind a search;
//! the server uses [`workers::LlmCapabilityFactory`], which drives one LLM browsing
//! agent per source.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama local inference (default) |
//! | `openai` | OpenAI API support |
//! | `swagger-ui` | Interactive API docs at `/swagger-ui/` |
//!
//! ## Modules
//!
//! - [`search`] - Aggregation engine: catalog, parser, dedup, runners, drain loop
//! - [`workers`] - Worker capability traits and the browsing agent
//! - [`llm`] - LLM client implementations
//! - [`tools`] - Browsing tools and registry
//! - [`api`] - HTTP handlers and routes
//! - [`types`] - Common types and error handling

#![cfg_attr(docsrs, feature(doc_cfg))]

/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Multi-source aggregation engine.
pub mod search;
/// Browsing tools (page fetch, web search).
pub mod tools;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration and display utilities.
pub mod utils;
/// Worker capabilities and their construction.
pub mod workers;

// Re-export commonly used types
pub use llm::{LLMClient, LLMResponse, Provider};
pub use search::{Catalog, SearchCoordinator, SearchEvent, SearchSettings, SearchStream};
pub use tools::ToolRegistry;
pub use types::{AppError, Location, LocationQuery, Result};
pub use utils::config::{ScoutConfig, ScoutConfigManager};
pub use workers::{CapabilityFactory, LlmCapabilityFactory, WorkerCapability};

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML configuration with hot-reload support
    pub config_manager: Arc<ScoutConfigManager>,
    /// Replaces the LLM browsing agents behind every worker when set
    pub factory: Option<Arc<dyn CapabilityFactory>>,
}

impl AppState {
    /// State backed by LLM browsing agents
    pub fn new(config_manager: Arc<ScoutConfigManager>) -> Self {
        Self {
            config_manager,
            factory: None,
        }
    }

    pub fn with_factory(
        config_manager: Arc<ScoutConfigManager>,
        factory: Arc<dyn CapabilityFactory>,
    ) -> Self {
        Self {
            config_manager,
            factory: Some(factory),
        }
    }

    /// Coordinator over one configuration snapshot; workers are built from it too
    pub fn coordinator(&self, config: &Arc<ScoutConfig>) -> SearchCoordinator {
        let factory = match &self.factory {
            Some(factory) => factory.clone(),
            None => Arc::new(LlmCapabilityFactory::new(config.clone())),
        };
        SearchCoordinator::new(config.catalog(), factory, config.search_settings())
    }
}
