use super::browser::BrowsingAgent;
use super::{CapabilityFactory, WorkerCapability};
use crate::llm::LLMClient;
use crate::search::catalog::WorkerSpec;
use crate::tools::ToolRegistry;
use crate::types::{AppError, Result};
use crate::utils::config::ScoutConfig;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Builds one [`BrowsingAgent`] per worker from one configuration snapshot
#[derive(Clone)]
pub struct LlmCapabilityFactory {
    config: Arc<ScoutConfig>,
}

impl LlmCapabilityFactory {
    pub fn new(config: Arc<ScoutConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CapabilityFactory for LlmCapabilityFactory {
    async fn create(&self, spec: &WorkerSpec) -> Result<Arc<dyn WorkerCapability>> {
        let config = &self.config;

        // The agent-level model override only applies to the agent's own provider
        let (provider_name, model) = match spec.provider.as_deref() {
            Some(name) => (name, None),
            None => (config.agent.provider.as_str(), config.agent.model.as_deref()),
        };

        let provider_config = config.get_provider(provider_name).ok_or_else(|| {
            AppError::Configuration(format!(
                "Provider '{}' for worker '{}' is not configured",
                provider_name, spec.name
            ))
        })?;

        let provider = provider_config.to_provider(model)?;
        let llm: Arc<dyn LLMClient> = Arc::from(provider.create_client().await?);
        debug!(worker = %spec.name, provider = provider.name(), model = llm.model_name(), "Built browsing agent");

        let tools = Arc::new(ToolRegistry::with_browsing_tools(config.search.max_page_chars));
        Ok(Arc::new(BrowsingAgent::new(llm, tools, config.browsing_settings())))
    }
}
