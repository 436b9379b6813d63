//! Multi-Source Location Search
//!
//! This module is the aggregation engine: it fans one [`LocationQuery`](crate::types::LocationQuery)
//! out to every source in the worker catalog, consumes each worker's single terminal
//! payload, deduplicates the extracted locations, and streams lifecycle and data
//! events back to the caller as they arrive.
//!
//! # Architecture
//!
//! - [`catalog`] - Worker sources as data (templates rendered per query)
//! - [`parser`] - Best-effort extraction of locations from worker payloads
//! - [`dedup`] - Per-search state: admitted keys, outstanding workers
//! - [`events`] - Runner messages and the caller-facing event protocol
//! - [`runner`] - Drives one worker from start to its single completion
//! - [`coordinator`] - Owns the runners and the drain loop
//!
//! Runners only ever send messages over a channel; the coordinator's drain loop
//! is the single owner of [`dedup::RunState`], so no locking is involved.
//!
//! # Usage
//!
//! ```ignore
//! use futures::StreamExt;
//! use scout::search::{Catalog, SearchCoordinator, SearchSettings};
//!
//! let coordinator = SearchCoordinator::new(Catalog::builtin(), factory, SearchSettings::default());
//! let mut events = coordinator.search(query);
//! while let Some(event) = events.next().await {
//!     println!("{}", event.to_json());
//! }
//! ```

/// Worker catalog and per-query rendering.
pub mod catalog;
/// Drain loop and stream pump.
pub mod coordinator;
/// Record identity and per-search state.
pub mod dedup;
/// Runner messages and outgoing events.
pub mod events;
/// Worker payload parsing.
pub mod parser;
/// Single-worker lifecycle.
pub mod runner;

pub use catalog::{Catalog, WorkerSpec, WorkerTemplate};
pub use coordinator::{SearchCoordinator, SearchSettings, SearchStream};
pub use events::SearchEvent;
