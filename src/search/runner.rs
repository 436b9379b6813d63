//! Worker runner: drives one capability invocation end-to-end.
//!
//! `Pending -> Running -> {Succeeded | Failed} -> Done`
//!
//! Every path, including a panic inside the capability, ends with exactly one
//! [`RunnerMessage::Finished`].

use super::catalog::WorkerSpec;
use super::events::RunnerMessage;
use super::parser;
use crate::types::Location;
use crate::workers::{CapabilityError, WorkerCapability};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Done,
}

pub struct WorkerRunner {
    spec: WorkerSpec,
    capability: Arc<dyn WorkerCapability>,
    tx: UnboundedSender<RunnerMessage>,
    state: WorkerState,
}

impl WorkerRunner {
    pub fn new(
        spec: WorkerSpec,
        capability: Arc<dyn WorkerCapability>,
        tx: UnboundedSender<RunnerMessage>,
    ) -> Self {
        Self {
            spec,
            capability,
            tx,
            state: WorkerState::Pending,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Run to completion and return the terminal state (always `Done`)
    pub async fn run(mut self) -> WorkerState {
        let start = Instant::now();
        self.transition(WorkerState::Running);
        self.send(RunnerMessage::Started {
            worker: self.spec.name.clone(),
        });

        let outcome = AssertUnwindSafe(async {
            let payload = self.capability.run(&self.spec).await?;
            debug!(bytes = payload.len(), "Worker returned payload");
            Ok::<Vec<Location>, CapabilityError>(parser::parse_payload(&payload, &self.spec.name))
        })
        .catch_unwind()
        .await;

        match outcome {
            Ok(Ok(records)) => {
                info!(
                    records = records.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Worker succeeded"
                );
                for record in records {
                    self.send(RunnerMessage::Candidate {
                        worker: self.spec.name.clone(),
                        record,
                    });
                }
                self.transition(WorkerState::Succeeded);
            }
            Ok(Err(e)) => {
                warn!("Worker failed: {}", e);
                self.send(RunnerMessage::Failed {
                    worker: self.spec.name.clone(),
                    message: e.to_string(),
                });
                self.transition(WorkerState::Failed);
            }
            Err(panic) => {
                let message = format!("worker panicked: {}", panic_message(panic.as_ref()));
                warn!("{}", message);
                self.send(RunnerMessage::Failed {
                    worker: self.spec.name.clone(),
                    message,
                });
                self.transition(WorkerState::Failed);
            }
        }

        self.send(RunnerMessage::Finished {
            worker: self.spec.name.clone(),
        });
        self.transition(WorkerState::Done);
        self.state
    }

    fn transition(&mut self, next: WorkerState) {
        debug!(from = ?self.state, to = ?next, "Worker state change");
        self.state = next;
    }

    fn send(&self, message: RunnerMessage) {
        // The receiver is gone once the caller disconnected
        if self.tx.send(message).is_err() {
            debug!("Event channel closed, dropping worker message");
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
