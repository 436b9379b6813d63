//! Web tools backed by daedra
//!
//! `fetch_page` turns a URL into markdown, `web_search` queries DuckDuckGo.

use crate::tools::registry::Tool;
use crate::tools::truncate_chars;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde_json::{Value, json};

fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("Missing '{}' parameter", key)))
}

/// Web search tool; result descriptions give a worker leads to follow
pub struct WebSearchTool {
    default_results: usize,
}

impl WebSearchTool {
    pub fn new(default_results: usize) -> Self {
        Self { default_results }
    }
}

impl Default for WebSearchTool {
    fn default() -> Self {
        Self::new(8)
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web and return result titles, URLs and snippets"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "num_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return",
                    "default": self.default_results
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let query = required_str(&args, "query")?;
        let num_results = args
            .get("num_results")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .unwrap_or(self.default_results);

        let search_args = daedra::SearchArgs {
            query: query.to_string(),
            options: Some(daedra::SearchOptions {
                num_results,
                ..Default::default()
            }),
        };

        let response = daedra::tools::search::perform_search(&search_args)
            .await
            .map_err(|e| AppError::Internal(format!("Search failed: {}", e)))?;

        let results: Vec<Value> = response
            .data
            .iter()
            .map(|r| {
                json!({
                    "title": r.title,
                    "url": r.url,
                    "description": r.description
                })
            })
            .collect();

        Ok(json!({
            "query": query,
            "results": results
        }))
    }
}

/// Page fetching tool; content is cut to `max_chars` to keep prompts bounded
pub struct FetchPageTool {
    max_chars: usize,
}

impl FetchPageTool {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

#[async_trait]
impl Tool for FetchPageTool {
    fn name(&self) -> &str {
        "fetch_page"
    }

    fn description(&self) -> &str {
        "Open a web page and return its text as markdown"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL of the page to open"
                },
                "selector": {
                    "type": "string",
                    "description": "Optional CSS selector to narrow the content"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let url = required_str(&args, "url")?;
        let selector = args
            .get("selector")
            .and_then(|v| v.as_str())
            .map(String::from);

        let fetch_args = daedra::VisitPageArgs {
            url: url.to_string(),
            include_images: false,
            selector,
        };

        let page = daedra::tools::fetch::fetch_page(&fetch_args)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to fetch page: {}", e)))?;

        Ok(json!({
            "url": page.url,
            "title": page.title,
            "content": truncate_chars(&page.content, self.max_chars)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_tool_definition() {
        let tool = WebSearchTool::default();
        assert_eq!(tool.name(), "web_search");

        let schema = tool.parameters_schema();
        assert_eq!(schema["required"], json!(["query"]));
        assert_eq!(schema["properties"]["num_results"]["default"], 8);
    }

    #[test]
    fn test_fetch_page_tool_definition() {
        let tool = FetchPageTool::new(500);
        assert_eq!(tool.name(), "fetch_page");
        assert_eq!(tool.parameters_schema()["required"], json!(["url"]));
    }

    #[tokio::test]
    async fn test_search_missing_query() {
        let result = WebSearchTool::default().execute(json!({})).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_fetch_page_blank_url() {
        let result = FetchPageTool::new(500).execute(json!({"url": "  "})).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
