//! Worker Capabilities
//!
//! A worker capability is the opaque unit of work behind one source: given a
//! [`WorkerSpec`] it eventually returns a single terminal text payload, or
//! fails with a textual error. The aggregation core only depends on the
//! [`WorkerCapability`] and [`CapabilityFactory`] traits defined here.
//!
//! # Module Structure
//!
//! - [`browser`](crate::workers::browser) - LLM-driven browsing agent bounded by a step budget
//! - [`factory`](crate::workers::factory) - Builds one browsing agent per catalog entry from config

/// LLM + tool loop that browses from a start URL.
pub mod browser;
/// Config-driven capability construction.
pub mod factory;

use crate::search::catalog::WorkerSpec;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use std::sync::Arc;

pub use browser::BrowsingAgent;
pub use factory::LlmCapabilityFactory;

/// Failure of one capability invocation.
///
/// The `Display` output is the bare failure description; it becomes the
/// `message` of the worker's error event unchanged.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Upstream(#[from] AppError),
}

impl CapabilityError {
    pub fn failed(message: impl Into<String>) -> Self {
        CapabilityError::Failed(message.into())
    }
}

/// The opaque operation a worker runner invokes exactly once
#[async_trait]
pub trait WorkerCapability: Send + Sync {
    /// Perform the task described by `spec`, within `spec.step_budget`
    async fn run(&self, spec: &WorkerSpec) -> std::result::Result<String, CapabilityError>;
}

/// Builds the capability for one catalog entry
#[async_trait]
pub trait CapabilityFactory: Send + Sync {
    /// Fails when the entry is misconfigured (unknown provider, missing key, ...)
    async fn create(&self, spec: &WorkerSpec) -> Result<Arc<dyn WorkerCapability>>;
}
