use std::time::Instant;

use crossbeam_channel::Receiver;

use crate::client::DeleteOutcome;
use crate::selection::SelectedItem;
use crate::table::TableId;

/// Lifecycle of one delete operation for a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Prompt shown, waiting for the operator
    Confirming,
    /// Requests issued, waiting for responses
    InFlight,
    /// All responses in, report being produced
    Reconciling,
    /// Finished and reported
    Done,
    /// Operator declined at the prompt
    Cancelled,
}

/// Message from a delete worker: the item's index in the batch and its outcome
pub type WorkerMessage = (usize, DeleteOutcome);

/// Counters of a batch that is waiting for responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub expected: usize,
    pub completed: usize,
    pub failed: usize,
}

impl BatchProgress {
    pub fn percentage(&self) -> f64 {
        if self.expected == 0 {
            100.0
        } else {
            (self.completed as f64 / self.expected as f64) * 100.0
        }
    }
}

/// Fan-in side of a bulk delete.
///
/// `completed` only grows through `record`, which accepts each index once,
/// so it can never exceed `expected`.
pub struct DeleteBatch {
    pub table: TableId,
    pub items: Vec<SelectedItem>,
    pub expected: usize,
    pub completed: usize,
    pub any_failed: bool,
    /// Index and outcome of every failed item, in arrival order
    pub failures: Vec<(usize, DeleteOutcome)>,
    pub state: BatchState,
    /// Set when the batch was started from a single row rather than the selection
    pub single: bool,
    responded: Vec<bool>,
    deadline: Instant,
    receiver: Receiver<WorkerMessage>,
}

impl DeleteBatch {
    pub fn new(
        table: TableId,
        items: Vec<SelectedItem>,
        single: bool,
        deadline: Instant,
        receiver: Receiver<WorkerMessage>,
    ) -> Self {
        let expected = items.len();
        Self {
            table,
            items,
            expected,
            completed: 0,
            any_failed: false,
            failures: Vec::new(),
            state: BatchState::InFlight,
            single,
            responded: vec![false; expected],
            deadline,
            receiver,
        }
    }

    /// Count one response. Returns false for unknown or already-counted indices.
    pub fn record(&mut self, index: usize, outcome: DeleteOutcome) -> bool {
        match self.responded.get_mut(index) {
            Some(seen) if !*seen => *seen = true,
            _ => return false,
        }
        self.completed += 1;
        if !outcome.is_success() {
            self.any_failed = true;
            self.failures.push((index, outcome));
        }
        true
    }

    /// Drain every response currently waiting in the channel
    pub fn drain(&mut self) -> usize {
        let mut counted = 0;
        while let Ok((index, outcome)) = self.receiver.try_recv() {
            if self.record(index, outcome) {
                counted += 1;
            }
        }
        counted
    }

    /// Record every unanswered item as timed out if the deadline has passed
    pub fn expire(&mut self, now: Instant) -> usize {
        if now < self.deadline {
            return 0;
        }
        let pending: Vec<usize> = self
            .responded
            .iter()
            .enumerate()
            .filter(|(_, seen)| !**seen)
            .map(|(i, _)| i)
            .collect();
        for &index in &pending {
            self.record(index, DeleteOutcome::TimedOut);
        }
        pending.len()
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.expected
    }

    pub fn progress(&self) -> BatchProgress {
        BatchProgress {
            expected: self.expected,
            completed: self.completed,
            failed: self.failures.len(),
        }
    }
}
