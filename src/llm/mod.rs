//! LLM Provider Clients
//!
//! Every browsing worker is driven by a model. This module hides the provider behind
//! the [`LLMClient`] trait so workers never know which backend they talk to.
//!
//! # Supported Providers
//!
//! Enable providers via Cargo features:
//! - `ollama` - Local Ollama server (default)
//! - `openai` - OpenAI API and compatible endpoints
//!
//! # Example
//!
//! ```ignore
//! use scout::llm::Provider;
//!
//! let provider = Provider::Ollama {
//!     base_url: "http://localhost:11434".to_string(),
//!     model: "llama3.1".to_string(),
//! };
//! let client = provider.create_client().await?;
//! let reply = client.generate_with_system("Be terse.", "What is 2+2?").await?;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai")]
pub mod openai;

pub use client::{LLMClient, LLMResponse, Provider};
