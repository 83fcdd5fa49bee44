//! Thread-safe min-priority queue of [`TaskRecord`]s.
//!
//! `submit` may be called from any number of threads or tasks while one
//! consumer drains. A drain takes a snapshot of everything queued when it
//! starts and hands those records out without holding the lock, so records
//! submitted mid-drain wait for the next drain.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use fleet_core::{Priority, RoverId, TaskKind};
use tokio::sync::Notify;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::handler::TaskHandler;
use crate::record::TaskRecord;
use crate::report::{DrainFailure, DrainReport};

/// Releases tasks in `(priority, submitted_at)` order.
#[derive(Debug, Default)]
pub struct TaskScheduler {
    state: Mutex<QueueState>,
    available: Notify,
}

#[derive(Debug, Default)]
struct QueueState {
    heap: BinaryHeap<Reverse<TaskRecord>>,
    next_sequence: u64,
    closed: bool,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The queue holds plain data, so a panic in another holder cannot
    /// leave it half-updated. Recover the guard instead of propagating.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a task and return its id.
    ///
    /// The timestamp and sequence number are taken under the queue lock,
    /// so concurrent submissions are ordered the same way they were
    /// linearized.
    pub fn submit(&self, target: RoverId, kind: TaskKind, priority: Priority) -> Uuid {
        let id = {
            let mut state = self.lock();
            let sequence = state.next_sequence;
            state.next_sequence += 1;
            let record = TaskRecord::new(target, kind, priority, Instant::now(), sequence);
            let id = record.id();
            debug!(
                task_id = %id,
                rover = %record.target(),
                kind = %record.kind(),
                priority,
                sequence,
                "Task queued"
            );
            state.heap.push(Reverse(record));
            id
        };
        self.available.notify_one();
        id
    }

    /// Take every queued record, most urgent first.
    fn take_snapshot(&self) -> BinaryHeap<Reverse<TaskRecord>> {
        std::mem::take(&mut self.lock().heap)
    }

    /// Hand every record queued at entry to `handler`, in dispatch order.
    ///
    /// A handler error is logged and recorded in the report; the remaining
    /// records are still delivered.
    pub fn drain<F>(&self, mut handler: F) -> DrainReport
    where
        F: FnMut(TaskRecord) -> anyhow::Result<()>,
    {
        let mut snapshot = self.take_snapshot();
        let mut report = DrainReport::default();

        while let Some(Reverse(record)) = snapshot.pop() {
            let receipt = record.clone();
            match handler(record) {
                Ok(()) => report.dispatched += 1,
                Err(e) => {
                    log_failure(&receipt, &e);
                    report.failures.push(DrainFailure::new(&receipt, &e));
                }
            }
        }

        log_report(&report);
        report
    }

    /// Async counterpart of [`drain`](Self::drain).
    pub async fn drain_with<H>(&self, handler: &H) -> DrainReport
    where
        H: TaskHandler + ?Sized,
    {
        let mut snapshot = self.take_snapshot();
        let mut report = DrainReport::default();

        while let Some(Reverse(record)) = snapshot.pop() {
            let receipt = record.clone();
            match handler.handle(record).await {
                Ok(()) => report.dispatched += 1,
                Err(e) => {
                    log_failure(&receipt, &e);
                    report.failures.push(DrainFailure::new(&receipt, &e));
                }
            }
        }

        log_report(&report);
        report
    }

    /// Remove the most urgent record without waiting.
    pub fn try_next(&self) -> Option<TaskRecord> {
        self.lock().heap.pop().map(|Reverse(record)| record)
    }

    /// Wait for the most urgent record.
    ///
    /// Returns `None` once the scheduler is closed and empty. Records still
    /// queued at close time are handed out first.
    pub async fn next(&self) -> Option<TaskRecord> {
        loop {
            let notified = self.available.notified();
            {
                let mut state = self.lock();
                if let Some(Reverse(record)) = state.heap.pop() {
                    return Some(record);
                }
                if state.closed {
                    return None;
                }
            }
            notified.await;
        }
    }

    /// Stop [`next`](Self::next) from waiting for new work. Submissions are
    /// still accepted and can be drained.
    pub fn close(&self) {
        self.lock().closed = true;
        self.available.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn is_empty(&self) -> bool {
        self.lock().heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().heap.len()
    }

    /// Copy of the queued records in the order a drain would deliver them.
    pub fn pending(&self) -> Vec<TaskRecord> {
        let mut records: Vec<TaskRecord> = self
            .lock()
            .heap
            .iter()
            .map(|Reverse(record)| record.clone())
            .collect();
        records.sort();
        records
    }
}

fn log_failure(record: &TaskRecord, error: &anyhow::Error) {
    warn!(
        task_id = %record.id(),
        rover = %record.target(),
        kind = %record.kind(),
        priority = record.priority(),
        error = %format!("{error:#}"),
        "Task dispatch failed, continuing drain"
    );
}

fn log_report(report: &DrainReport) {
    if report.total() == 0 {
        debug!("Drain found no queued tasks");
        return;
    }
    info!(
        dispatched = report.dispatched,
        failed = report.failures.len(),
        "Drain complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn rover(id: &str) -> RoverId {
        RoverId::new(id).unwrap()
    }

    fn drain_targets(scheduler: &TaskScheduler) -> Vec<String> {
        let mut seen = Vec::new();
        scheduler.drain(|record| {
            seen.push(record.target().to_string());
            Ok(())
        });
        seen
    }

    #[test]
    fn test_new_scheduler_is_empty() {
        let scheduler = TaskScheduler::new();
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.len(), 0);
        assert!(!scheduler.is_closed());
    }

    #[test]
    fn test_drain_orders_by_priority() {
        let scheduler = TaskScheduler::new();
        scheduler.submit(rover("A"), TaskKind::Weeding, 5);
        scheduler.submit(rover("B"), TaskKind::Irrigation, 1);
        scheduler.submit(rover("C"), TaskKind::SoilAnalysis, 3);

        assert_eq!(drain_targets(&scheduler), vec!["B", "C", "A"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_sequence_increases_per_submit() {
        let scheduler = TaskScheduler::new();
        scheduler.submit(rover("A"), TaskKind::Weeding, 1);
        scheduler.submit(rover("B"), TaskKind::Weeding, 1);
        let pending = scheduler.pending();
        assert_eq!(pending[0].sequence(), 0);
        assert_eq!(pending[1].sequence(), 1);
    }

    #[test]
    fn test_pending_does_not_consume() {
        let scheduler = TaskScheduler::new();
        scheduler.submit(rover("A"), TaskKind::Weeding, 9);
        scheduler.submit(rover("B"), TaskKind::Weeding, 0);

        let pending: Vec<String> = scheduler
            .pending()
            .iter()
            .map(|r| r.target().to_string())
            .collect();
        assert_eq!(pending, vec!["B", "A"]);
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn test_submit_during_drain_waits_for_next_pass() {
        let scheduler = TaskScheduler::new();
        scheduler.submit(rover("A"), TaskKind::Weeding, 1);
        scheduler.submit(rover("B"), TaskKind::Weeding, 2);

        let mut seen = Vec::new();
        let report = scheduler.drain(|record| {
            if record.target().as_str() == "A" {
                scheduler.submit(rover("late"), TaskKind::Irrigation, 0);
            }
            seen.push(record.target().to_string());
            Ok(())
        });

        assert_eq!(seen, vec!["A", "B"]);
        assert_eq!(report.dispatched, 2);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(drain_targets(&scheduler), vec!["late"]);
    }

    #[test]
    fn test_failures_are_reported() {
        let scheduler = TaskScheduler::new();
        scheduler.submit(rover("A"), TaskKind::Weeding, 1);
        let failing = scheduler.submit(rover("B"), TaskKind::Irrigation, 2);

        let report = scheduler.drain(|record| {
            if record.target().as_str() == "B" {
                anyhow::bail!("rover offline");
            }
            Ok(())
        });

        assert_eq!(report.dispatched, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.total(), 2);
        assert!(!report.is_clean());
        let failure = &report.failures[0];
        assert_eq!(failure.task_id, failing);
        assert_eq!(failure.kind, TaskKind::Irrigation);
        assert_eq!(failure.error, "rover offline");
    }

    #[test]
    fn test_try_next_pops_most_urgent() {
        let scheduler = TaskScheduler::new();
        assert!(scheduler.try_next().is_none());
        scheduler.submit(rover("A"), TaskKind::Weeding, 3);
        scheduler.submit(rover("B"), TaskKind::Weeding, -1);
        assert_eq!(scheduler.try_next().unwrap().target().as_str(), "B");
        assert_eq!(scheduler.try_next().unwrap().target().as_str(), "A");
        assert!(scheduler.try_next().is_none());
    }

    #[tokio::test]
    async fn test_next_returns_queued_record() {
        let scheduler = TaskScheduler::new();
        scheduler.submit(rover("A"), TaskKind::CropMonitoring, 1);
        let record = scheduler.next().await.unwrap();
        assert_eq!(record.kind(), TaskKind::CropMonitoring);
    }

    #[tokio::test]
    async fn test_next_wakes_on_submit() {
        let scheduler = Arc::new(TaskScheduler::new());
        let waiter = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.next().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        scheduler.submit(rover("late"), TaskKind::Weeding, 1);

        let record = tokio::time::timeout(Duration::from_secs(2), waiter)
            .await
            .expect("waiter timed out")
            .unwrap()
            .unwrap();
        assert_eq!(record.target().as_str(), "late");
    }

    #[tokio::test]
    async fn test_close_releases_waiters() {
        let scheduler = Arc::new(TaskScheduler::new());
        let waiter = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.next().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        scheduler.close();

        let result = tokio::time::timeout(Duration::from_secs(2), waiter)
            .await
            .expect("waiter timed out")
            .unwrap();
        assert!(result.is_none());
        assert!(scheduler.is_closed());
    }

    #[tokio::test]
    async fn test_closed_scheduler_still_yields_queued_records() {
        let scheduler = TaskScheduler::new();
        scheduler.submit(rover("A"), TaskKind::Weeding, 1);
        scheduler.close();
        assert!(scheduler.next().await.is_some());
        assert!(scheduler.next().await.is_none());
    }
}
