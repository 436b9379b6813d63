use super::catalog::Catalog;
use super::dedup::RunState;
use super::events::{RunnerMessage, SearchEvent};
use super::runner::{WorkerRunner, WorkerState};
use crate::types::LocationQuery;
use crate::workers::CapabilityFactory;
use async_stream::stream;
use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

/// Event stream for one search
pub type SearchStream = Pin<Box<dyn Stream<Item = SearchEvent> + Send>>;

/// Tuning for the drain loop
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// How long the drain loop waits for an event before re-checking termination
    pub drain_interval: Duration,
    /// Abort in-flight workers when the event stream is dropped
    pub cancel_on_disconnect: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            drain_interval: Duration::from_secs(1),
            cancel_on_disconnect: true,
        }
    }
}

/// Fans one query out to every catalog source and streams what they find.
#[derive(Clone)]
pub struct SearchCoordinator {
    catalog: Catalog,
    factory: Arc<dyn CapabilityFactory>,
    settings: SearchSettings,
}

impl SearchCoordinator {
    pub fn new(catalog: Catalog, factory: Arc<dyn CapabilityFactory>, settings: SearchSettings) -> Self {
        Self {
            catalog,
            factory,
            settings,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Start a search. Workers are launched when the stream is first polled.
    ///
    /// The stream ends with `AllDone` (possibly preceded by a `Fallback`
    /// record) or with a single `FatalError`.
    pub fn search(&self, query: LocationQuery) -> SearchStream {
        Box::pin(self.clone().into_stream(query))
    }

    fn into_stream(self, query: LocationQuery) -> impl Stream<Item = SearchEvent> + Send + 'static {
        stream! {
            let search_id = Uuid::new_v4();
            let started = Instant::now();
            info!(%search_id, franchise = %query.franchise_name, place = %query.place(), "Search started");

            yield SearchEvent::init();

            let (tx, mut rx) = mpsc::unbounded_channel::<RunnerMessage>();
            let mut runners = RunnerSet::new(self.settings.cancel_on_disconnect);

            for spec in self.catalog.specs_for(&query) {
                match self.factory.create(&spec).await {
                    Ok(capability) => {
                        let span = info_span!("worker", %search_id, name = %spec.name);
                        let runner = WorkerRunner::new(spec, capability, tx.clone());
                        runners.spawn(runner.run().instrument(span));
                    }
                    Err(e) => warn!(%search_id, "Failed to create worker '{}': {}", spec.name, e),
                }
            }
            // Only runners hold senders from here on
            drop(tx);

            if runners.is_empty() {
                warn!(%search_id, "No search workers could be started");
                yield SearchEvent::fatal("Failed to create any search agents");
                return;
            }

            let mut state = RunState::new(runners.len());
            info!(%search_id, workers = runners.len(), "Workers started");

            loop {
                if state.remaining_workers() == 0 && rx.is_empty() {
                    break;
                }

                match tokio::time::timeout(self.settings.drain_interval, rx.recv()).await {
                    Ok(Some(message)) => {
                        if let Some(event) = apply(&mut state, message) {
                            yield event;
                        }
                    }
                    Ok(None) => {
                        if state.remaining_workers() > 0 {
                            warn!(
                                %search_id,
                                remaining = state.remaining_workers(),
                                "Event channel closed before every worker finished"
                            );
                            // A runner went away without reporting completion
                            let message = runners
                                .join_failure()
                                .await
                                .unwrap_or_else(|| "Worker task ended without completing".to_string());
                            tracing::error!(%search_id, "Search aborted: {}", message);
                            yield SearchEvent::fatal(message);
                            return;
                        }
                        break;
                    }
                    Err(_) => {
                        debug!(%search_id, remaining = state.remaining_workers(), "Waiting for workers");
                    }
                }

                if let Some(message) = runners.reap_failure() {
                    tracing::error!(%search_id, "Search aborted: {}", message);
                    yield SearchEvent::fatal(message);
                    return;
                }
            }

            if !state.any_record_emitted() {
                yield SearchEvent::fallback(&query.franchise_name, &query.place());
            }

            info!(
                %search_id,
                records = state.admitted_count(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Search complete"
            );
            yield SearchEvent::AllDone;
        }
    }
}

/// Apply one runner message to the run state; `None` means "forward nothing"
fn apply(state: &mut RunState, message: RunnerMessage) -> Option<SearchEvent> {
    match message {
        RunnerMessage::Started { worker } => Some(SearchEvent::progress(&worker)),
        RunnerMessage::Candidate { worker, record } => {
            if state.admit(&record) {
                Some(SearchEvent::record(record))
            } else {
                debug!(worker = %worker, address = %record.address, "Dropping duplicate location");
                None
            }
        }
        RunnerMessage::Failed { worker, message } => Some(SearchEvent::WorkerError {
            source: worker,
            message,
        }),
        RunnerMessage::Finished { worker } => {
            state.worker_finished();
            Some(SearchEvent::WorkerDone { source: worker })
        }
    }
}

/// Runner tasks owned by one search stream
struct RunnerSet {
    tasks: JoinSet<WorkerState>,
    cancel_on_drop: bool,
}

impl RunnerSet {
    fn new(cancel_on_drop: bool) -> Self {
        Self {
            tasks: JoinSet::new(),
            cancel_on_drop,
        }
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = WorkerState> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    fn len(&self) -> usize {
        self.tasks.len()
    }

    fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Collect finished tasks; report a task that died outside its own containment
    fn reap_failure(&mut self) -> Option<String> {
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(e) = result
                && e.is_panic()
            {
                return Some(format!("Worker task failed: {}", e));
            }
        }
        None
    }

    /// Wait for every remaining task; report the first that died outside its containment
    async fn join_failure(&mut self) -> Option<String> {
        let mut failure = None;
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result
                && failure.is_none()
            {
                failure = Some(format!("Worker task failed: {}", e));
            }
        }
        failure
    }
}

impl Drop for RunnerSet {
    fn drop(&mut self) {
        if !self.cancel_on_drop {
            // Dropping a JoinSet aborts its tasks; detached ones run to completion
            self.tasks.detach_all();
        }
    }
}
