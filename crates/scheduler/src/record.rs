use std::cmp::Ordering;
use std::time::Instant;

use fleet_core::{Priority, RoverId, TaskKind};
use uuid::Uuid;

/// One unit of work for one rover.
///
/// Records are immutable: changing the priority or target of a task means
/// submitting a new record. Ordering compares `(priority, submitted_at,
/// sequence)` and ignores every other field.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    id: Uuid,
    target: RoverId,
    kind: TaskKind,
    priority: Priority,
    submitted_at: Instant,
    sequence: u64,
}

impl TaskRecord {
    pub(crate) fn new(
        target: RoverId,
        kind: TaskKind,
        priority: Priority,
        submitted_at: Instant,
        sequence: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            target,
            kind,
            priority,
            submitted_at,
            sequence,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn target(&self) -> &RoverId {
        &self.target
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn submitted_at(&self) -> Instant {
        self.submitted_at
    }

    /// Position in the owning scheduler's submission order. Breaks ties
    /// when two submissions observe the same `submitted_at`.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    fn sort_key(&self) -> (Priority, Instant, u64) {
        (self.priority, self.submitted_at, self.sequence)
    }
}

impl PartialEq for TaskRecord {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for TaskRecord {}

impl PartialOrd for TaskRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TaskRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}
