//! Browsing Tools
//!
//! The actions a browsing worker may take besides talking to its model.
//!
//! - [`registry`] - Tool trait, registration and dispatch by name
//! - [`web`] - Page fetching and web search backed by daedra
//!
//! ```ignore
//! let registry = ToolRegistry::with_browsing_tools(12_000);
//! let page = registry.execute("fetch_page", json!({"url": "https://example.com"})).await?;
//! ```

/// Tool registry for managing available tools.
pub mod registry;
/// Web tools using daedra.
pub mod web;

pub use registry::{Tool, ToolRegistry};
pub use web::{FetchPageTool, WebSearchTool};

/// Cut `text` to at most `max_chars` characters, marking the cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}\n...[truncated]", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_chars("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let cut = truncate_chars("héllo wörld", 4);
        assert!(cut.starts_with("héll"));
        assert!(cut.ends_with("[truncated]"));
    }
}
