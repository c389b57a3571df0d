// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! The async job queue: persistent FIFO with status lifecycle, dedup, and
//! non-blocking pub/sub notifications (spec §4.B).

use std::sync::Arc;

use parking_lot::RwLock;
use qntx_core::{Clock, Job, JobId, JobStatus};
use qntx_storage::Store;
use tokio::sync::{mpsc, Notify};

use crate::error::QueueError;
use crate::subscriber::{JobUpdate, SubscriptionId, Subscribers};

/// Active (queued + running) counts used by Pulse's heartbeat display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobCounts {
    pub queued: usize,
    pub running: usize,
}

impl JobCounts {
    pub fn active(&self) -> usize {
        self.queued + self.running
    }
}

/// Full breakdown across every [`JobStatus`], for UI display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub queued: usize,
    pub running: usize,
    pub paused: usize,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
}

/// Persistent FIFO job queue.
///
/// Spec §4.B/§5: a single reader/writer lock protects the subscriber list
/// and mediates store calls; it is held while notifying so no update is
/// reordered relative to the store mutation that produced it. Mutating
/// operations take the write side; `stats`/`get_job_counts`/dedup lookups
/// take the read side.
pub struct AsyncQueue<S: Store, C: Clock> {
    store: Arc<S>,
    clock: C,
    subscribers: RwLock<Subscribers>,
    /// Woken on every enqueue/resume so the worker pool doesn't have to
    /// poll on a tight timer (mirrors a worker "wake" signal).
    wake: Arc<Notify>,
}

impl<S: Store, C: Clock> AsyncQueue<S, C> {
    pub fn new(store: Arc<S>, clock: C) -> Self {
        Self { store, clock, subscribers: RwLock::new(Subscribers::new()), wake: Arc::new(Notify::new()) }
    }

    /// Shared wake signal the worker pool can await instead of polling.
    pub fn wake_handle(&self) -> Arc<Notify> {
        self.wake.clone()
    }

    pub fn enqueue(&self, job: Job) -> Result<JobId, QueueError> {
        let id = job.id;
        let mut subs = self.subscribers.write();
        self.store.create_job(job.clone())?;
        subs.notify(JobUpdate::Enqueued(job));
        drop(subs);
        self.wake.notify_waiters();
        Ok(id)
    }

    /// Atomically select the oldest `queued` job and advance it to `running`.
    pub fn dequeue(&self) -> Result<Option<Job>, QueueError> {
        let mut subs = self.subscribers.write();
        // `list_active_jobs` is oldest-first (spec §5 insertion-order ties).
        let mut candidates = self.store.list_active_jobs(usize::MAX)?;
        candidates.retain(|j| j.status == JobStatus::Queued);
        let Some(mut job) = candidates.into_iter().next() else { return Ok(None) };
        job.status = JobStatus::Running;
        job.updated_at = self.clock.epoch_ms();
        self.store.update_job(job.clone())?;
        subs.notify(JobUpdate::Dequeued(job.clone()));
        Ok(Some(job))
    }

    pub fn pause(&self, id: &JobId, reason: impl Into<String>) -> Result<(), QueueError> {
        let mut subs = self.subscribers.write();
        let mut job = self.get_or_not_found(id)?;
        if job.status != JobStatus::Running {
            return Err(QueueError::InvalidTransition {
                id: id.to_string(),
                action: "pause",
                current: job.status,
                required: "running",
            });
        }
        job.status = JobStatus::Paused;
        job.pause_reason = Some(reason.into());
        job.updated_at = self.clock.epoch_ms();
        self.store.update_job(job.clone())?;
        subs.notify(JobUpdate::Paused(job));
        Ok(())
    }

    pub fn resume(&self, id: &JobId) -> Result<(), QueueError> {
        let mut subs = self.subscribers.write();
        let mut job = self.get_or_not_found(id)?;
        if job.status != JobStatus::Paused {
            return Err(QueueError::InvalidTransition {
                id: id.to_string(),
                action: "resume",
                current: job.status,
                required: "paused",
            });
        }
        job.status = JobStatus::Running;
        job.pause_reason = None;
        job.updated_at = self.clock.epoch_ms();
        self.store.update_job(job.clone())?;
        subs.notify(JobUpdate::Resumed(job));
        drop(subs);
        self.wake.notify_waiters();
        Ok(())
    }

    pub fn complete(&self, id: &JobId) -> Result<(), QueueError> {
        let mut subs = self.subscribers.write();
        let mut job = self.get_or_not_found(id)?;
        job.status = JobStatus::Completed;
        job.updated_at = self.clock.epoch_ms();
        self.store.update_job(job.clone())?;
        subs.notify(JobUpdate::Completed(job));
        Ok(())
    }

    /// Advance to `failed`. Children are never auto-cancelled (spec §3.2).
    pub fn fail(&self, id: &JobId, error: impl Into<String>) -> Result<(), QueueError> {
        let mut subs = self.subscribers.write();
        let mut job = self.get_or_not_found(id)?;
        job.status = JobStatus::Failed;
        job.error = Some(error.into());
        job.updated_at = self.clock.epoch_ms();
        self.store.update_job(job.clone())?;
        subs.notify(JobUpdate::Failed(job));
        Ok(())
    }

    pub fn report_progress(&self, id: &JobId, progress: qntx_core::Progress) -> Result<(), QueueError> {
        let mut job = self.get_or_not_found(id)?;
        job.progress = progress;
        job.updated_at = self.clock.epoch_ms();
        self.store.update_job(job)?;
        Ok(())
    }

    pub fn report_cost(&self, id: &JobId, cost_actual: f64) -> Result<(), QueueError> {
        let mut job = self.get_or_not_found(id)?;
        job.cost_actual = Some(cost_actual);
        job.updated_at = self.clock.epoch_ms();
        self.store.update_job(job)?;
        Ok(())
    }

    /// Cancel every non-terminal child, then delete the parent. Terminal
    /// children are preserved for history (spec §4.B, §8 scenario 5).
    pub fn delete_with_children(&self, id: &JobId) -> Result<(), QueueError> {
        let mut subs = self.subscribers.write();
        let now = self.clock.epoch_ms();
        for mut child in self.store.list_tasks_by_parent(id)? {
            if child.status.is_terminal() {
                continue;
            }
            child.status = JobStatus::Cancelled;
            child.pause_reason = None;
            child.error = Some("parent job deleted".to_string());
            child.updated_at = now;
            self.store.update_job(child.clone())?;
            subs.notify(JobUpdate::Cancelled(child));
        }
        self.store.delete_job(id)?;
        subs.notify(JobUpdate::Deleted(*id));
        Ok(())
    }

    pub fn subscribe(&self) -> (SubscriptionId, mpsc::Receiver<JobUpdate>) {
        self.subscribers.write().add()
    }

    /// Detaches the subscriber but does not close its channel — ownership
    /// of the receiver stays with the caller (spec §4.B).
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.write().remove(id);
    }

    pub fn stats(&self) -> Result<QueueStats, QueueError> {
        let _subs = self.subscribers.read();
        let mut stats = QueueStats::default();
        for job in self.store.list_jobs(None, usize::MAX)? {
            match job.status {
                JobStatus::Queued => stats.queued += 1,
                JobStatus::Running => stats.running += 1,
                JobStatus::Paused => stats.paused += 1,
                JobStatus::Completed => stats.completed += 1,
                JobStatus::Failed => stats.failed += 1,
                JobStatus::Cancelled => stats.cancelled += 1,
            }
        }
        Ok(stats)
    }

    /// Queued/running counts, for Pulse's heartbeat density indicator.
    pub fn get_job_counts(&self) -> Result<JobCounts, QueueError> {
        let _subs = self.subscribers.read();
        let mut counts = JobCounts::default();
        for job in self.store.list_active_jobs(usize::MAX)? {
            match job.status {
                JobStatus::Queued => counts.queued += 1,
                JobStatus::Running => counts.running += 1,
                _ => {}
            }
        }
        Ok(counts)
    }

    pub fn find_active_job_by_source_and_handler(
        &self,
        source: &str,
        handler_name: &str,
    ) -> Result<Option<Job>, QueueError> {
        let _subs = self.subscribers.read();
        Ok(self.store.find_active_job_by_source_and_handler(source, handler_name)?)
    }

    pub fn get(&self, id: &JobId) -> Result<Option<Job>, QueueError> {
        Ok(self.store.get_job(id)?)
    }

    fn get_or_not_found(&self, id: &JobId) -> Result<Job, QueueError> {
        self.store.get_job(id)?.ok_or_else(|| QueueError::NotFound { id: id.to_string() })
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
