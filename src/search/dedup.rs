//! Per-request bookkeeping: admitted record keys, outstanding workers, and
//! whether any record has reached the caller.
//!
//! [`RunState`] has a single owner, the coordinator's drain loop. Runners never
//! touch it; they submit messages, and the drain loop applies them here.

use crate::types::Location;
use std::collections::HashSet;

/// Record identity used for deduplication: address and phone, exact match.
///
/// The source label is deliberately not part of the key, so the same location
/// reported by two sources collapses into the first report.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey(String);

impl RecordKey {
    pub fn of(record: &Location) -> Self {
        Self(format!("{}|{}", record.address, record.phone))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Default)]
pub struct RunState {
    admitted: HashSet<RecordKey>,
    remaining_workers: usize,
    any_record_emitted: bool,
}

impl RunState {
    pub fn new(workers: usize) -> Self {
        Self {
            admitted: HashSet::new(),
            remaining_workers: workers,
            any_record_emitted: false,
        }
    }

    /// Admit `candidate` if its key has not been seen in this run.
    pub fn admit(&mut self, candidate: &Location) -> bool {
        let admitted = self.admitted.insert(RecordKey::of(candidate));
        if admitted {
            self.any_record_emitted = true;
        }
        admitted
    }

    /// Record one worker's completion; extra calls past zero are ignored
    pub fn worker_finished(&mut self) {
        self.remaining_workers = self.remaining_workers.saturating_sub(1);
    }

    pub fn remaining_workers(&self) -> usize {
        self.remaining_workers
    }

    pub fn any_record_emitted(&self) -> bool {
        self.any_record_emitted
    }

    pub fn admitted_count(&self) -> usize {
        self.admitted.len()
    }
}
