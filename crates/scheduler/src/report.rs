use fleet_core::{Priority, RoverId, TaskKind};
use uuid::Uuid;

use crate::record::TaskRecord;

/// A record the handler rejected during a drain.
#[derive(Debug, Clone)]
pub struct DrainFailure {
    pub task_id: Uuid,
    pub target: RoverId,
    pub kind: TaskKind,
    pub priority: Priority,
    pub error: String,
}

impl DrainFailure {
    pub(crate) fn new(record: &TaskRecord, error: &anyhow::Error) -> Self {
        Self {
            task_id: record.id(),
            target: record.target().clone(),
            kind: record.kind(),
            priority: record.priority(),
            error: format!("{error:#}"),
        }
    }
}

/// Outcome of one drain pass.
#[derive(Debug, Default, Clone)]
pub struct DrainReport {
    /// Records the handler accepted.
    pub dispatched: usize,
    pub failures: Vec<DrainFailure>,
}

impl DrainReport {
    /// Number of records handed to the handler.
    pub fn total(&self) -> usize {
        self.dispatched + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
