//! Mock implementations for testing.
//!
//! Scripted worker capabilities and factories that can be used across
//! different test files without any network or model access.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::StreamExt;
use scout::search::{Catalog, SearchCoordinator, SearchEvent, SearchSettings, WorkerSpec, WorkerTemplate};
use scout::types::{AppError, Result};
use scout::workers::{CapabilityError, CapabilityFactory, WorkerCapability};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// What a scripted worker does once invoked
#[derive(Clone, Debug)]
pub enum Outcome {
    Payload(String),
    Fail(String),
    Panic(String),
    /// Panics with a payload whose own drop panics again
    PanicOnDrop,
}

/// Panic payload that panics once more when released
struct Grenade;

impl Drop for Grenade {
    fn drop(&mut self) {
        panic!("payload exploded on drop");
    }
}

/// Worker capability that waits, then plays back one outcome.
#[derive(Clone)]
pub struct ScriptedCapability {
    outcome: Outcome,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    finished: Arc<AtomicBool>,
}

impl ScriptedCapability {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            finished: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn payload(payload: &str) -> Self {
        Self::new(Outcome::Payload(payload.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::new(Outcome::Fail(message.to_string()))
    }

    pub fn panicking(message: &str) -> Self {
        Self::new(Outcome::Panic(message.to_string()))
    }

    /// Panics in a way the runner's own containment cannot absorb
    pub fn escaping_panic() -> Self {
        Self::new(Outcome::PanicOnDrop)
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Whether the capability ran past its delay
    pub fn finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkerCapability for ScriptedCapability {
    async fn run(&self, _spec: &WorkerSpec) -> std::result::Result<String, CapabilityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.finished.store(true, Ordering::SeqCst);

        match &self.outcome {
            Outcome::Payload(payload) => Ok(payload.clone()),
            Outcome::Fail(message) => Err(CapabilityError::failed(message.clone())),
            Outcome::Panic(message) => panic!("{}", message),
            Outcome::PanicOnDrop => std::panic::panic_any(Grenade),
        }
    }
}

/// Factory handing out scripted capabilities by worker name.
///
/// Names without a script fail construction, like a worker whose provider
/// is misconfigured.
#[derive(Default)]
pub struct ScriptedFactory {
    scripts: HashMap<String, ScriptedCapability>,
}

impl ScriptedFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, capability: ScriptedCapability) -> Self {
        self.scripts.insert(name.to_string(), capability);
        self
    }
}

#[async_trait]
impl CapabilityFactory for ScriptedFactory {
    async fn create(&self, spec: &WorkerSpec) -> Result<Arc<dyn WorkerCapability>> {
        match self.scripts.get(&spec.name) {
            Some(capability) => Ok(Arc::new(capability.clone())),
            None => Err(AppError::Configuration(format!(
                "No capability for worker '{}'",
                spec.name
            ))),
        }
    }
}

/// Catalog with one trivial template per name
pub fn catalog(names: &[&str]) -> Catalog {
    Catalog::new(
        names
            .iter()
            .map(|name| {
                WorkerTemplate::new(
                    *name,
                    "Find {franchise} in {city}",
                    "https://example.com/search?q={franchise}",
                    5,
                )
            })
            .collect(),
    )
}

/// Settings with a short drain interval so tests stay fast
pub fn fast_settings() -> SearchSettings {
    SearchSettings {
        drain_interval: Duration::from_millis(20),
        cancel_on_disconnect: true,
    }
}

pub fn coordinator(names: &[&str], factory: ScriptedFactory) -> SearchCoordinator {
    SearchCoordinator::new(catalog(names), Arc::new(factory), fast_settings())
}

pub fn query() -> scout::LocationQuery {
    scout::LocationQuery::new("Subway", "USA", "Colorado", "Denver")
}

/// Run a search to the end and collect every event
pub async fn collect(coordinator: &SearchCoordinator) -> Vec<SearchEvent> {
    coordinator.search(query()).collect().await
}

pub fn position(events: &[SearchEvent], wanted: &SearchEvent) -> usize {
    events
        .iter()
        .position(|e| e == wanted)
        .unwrap_or_else(|| panic!("event {:?} not found in {:?}", wanted, events))
}

pub fn count(events: &[SearchEvent], kind: &str) -> usize {
    events.iter().filter(|e| e.kind() == kind).count()
}
