//! LLM-driven browsing worker
//!
//! The agent opens the worker's start URL, then alternates between asking its
//! model for the next action and executing the requested tools, until the model
//! answers without tool calls or the step budget runs out.

use super::{CapabilityError, WorkerCapability};
use crate::llm::LLMClient;
use crate::search::catalog::WorkerSpec;
use crate::tools::{ToolRegistry, truncate_chars};
use crate::types::ToolCall;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You are a meticulous research assistant operating a web browser. \
Use the available tools to open pages and search the web. Only report information you have \
seen on a page. When you are finished, reply without calling any tool; that reply is your \
final answer and must follow the output format the task asks for.";

/// Settings shared by every agent a factory builds
#[derive(Debug, Clone)]
pub struct BrowsingSettings {
    /// Upper bound on the characters kept from one tool result
    pub max_observation_chars: usize,
    /// Upper bound on one tool execution
    pub tool_timeout: Duration,
}

impl Default for BrowsingSettings {
    fn default() -> Self {
        Self {
            max_observation_chars: 12_000,
            tool_timeout: Duration::from_secs(30),
        }
    }
}

/// One thing the agent has seen so far
#[derive(Debug, Clone, PartialEq)]
struct Observation {
    action: String,
    output: String,
}

pub struct BrowsingAgent {
    llm: Arc<dyn LLMClient>,
    tools: Arc<ToolRegistry>,
    settings: BrowsingSettings,
}

impl BrowsingAgent {
    pub fn new(llm: Arc<dyn LLMClient>, tools: Arc<ToolRegistry>, settings: BrowsingSettings) -> Self {
        Self {
            llm,
            tools,
            settings,
        }
    }

    async fn call_tool(&self, call: &ToolCall) -> Observation {
        let action = format!("{}({})", call.name, call.arguments);

        let output = match timeout(
            self.settings.tool_timeout,
            self.tools.execute(&call.name, call.arguments.clone()),
        )
        .await
        {
            Ok(Ok(value)) => render_value(&value),
            Ok(Err(e)) => {
                debug!("Tool {} failed: {}", call.name, e);
                format!("error: {}", e)
            }
            Err(_) => format!("error: {} timed out", call.name),
        };

        Observation {
            action,
            output: truncate_chars(&output, self.settings.max_observation_chars),
        }
    }
}

fn render_value(value: &Value) -> String {
    match value.get("content").and_then(|c| c.as_str()) {
        Some(content) => content.to_string(),
        None => value.to_string(),
    }
}

fn build_prompt(spec: &WorkerSpec, observations: &[Observation], steps_left: u32) -> String {
    let mut prompt = format!("Task:\n{}\n\nStart page: {}\n", spec.task_description, spec.start_url);

    for (i, observation) in observations.iter().enumerate() {
        let _ = write!(
            prompt,
            "\n--- Step {}: {} ---\n{}\n",
            i + 1,
            observation.action,
            observation.output
        );
    }

    let _ = write!(
        prompt,
        "\nYou have {} step(s) left. Call a tool to continue browsing, or reply with the final answer.",
        steps_left
    );
    prompt
}

#[async_trait]
impl WorkerCapability for BrowsingAgent {
    async fn run(&self, spec: &WorkerSpec) -> Result<String, CapabilityError> {
        let budget = spec.step_budget;
        if budget == 0 {
            return Ok(String::new());
        }

        let definitions = self.tools.get_tool_definitions();
        let mut observations = Vec::new();

        let opening = ToolCall {
            id: "open".to_string(),
            name: "fetch_page".to_string(),
            arguments: json!({ "url": spec.start_url }),
        };
        observations.push(self.call_tool(&opening).await);
        let mut steps = 1;

        while steps < budget {
            let prompt = build_prompt(spec, &observations, budget - steps);
            let response = self
                .llm
                .generate_with_tools(SYSTEM_PROMPT, &prompt, &definitions)
                .await?;
            steps += 1;

            if response.tool_calls.is_empty() {
                debug!(steps, model = self.llm.model_name(), "Agent produced final answer");
                return Ok(response.content);
            }

            for call in &response.tool_calls {
                observations.push(self.call_tool(call).await);
            }
        }

        warn!(budget, "Step budget exhausted without a final answer");
        Ok(String::new())
    }
}
