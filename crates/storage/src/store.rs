// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! The `Store` trait: the persistence surface application code depends
//! on, plus its two implementations — [`WalStore`] (durable, backed by
//! a WAL + periodic snapshot) and [`InMemoryStore`] (non-durable, for
//! tests that don't need a filesystem).

use std::path::Path;

use parking_lot::Mutex;
use qntx_core::{
    Event, Execution, ExecutionId, ExecutionStatus, Job, JobId, JobStatus, ScheduledJob,
    ScheduledJobId, ScheduledJobState, TaskLog, FORCE_TRIGGER_MARKER,
};
use tokio_util::sync::CancellationToken;

use crate::checkpoint::{load_snapshot, Checkpointer};
use crate::error::StoreError;
use crate::state::{list_logs_for_task, list_stages_for_job, MaterializedState, StageSummary};
use crate::wal::Wal;

/// Persistence surface for `ScheduledJob`, `Execution`, `Job`, and
/// `TaskLog`, plus the specialized queries spec'd for Pulse and the
/// worker pool (spec §4.A).
pub trait Store: Send + Sync {
    fn create_scheduled_job(&self, job: ScheduledJob) -> Result<(), StoreError>;
    fn get_scheduled_job(&self, id: &ScheduledJobId) -> Result<Option<ScheduledJob>, StoreError>;
    /// Active scheduled jobs with `next_run_at <= now`, ordered by
    /// `next_run_at` ascending, capped at `limit`.
    fn list_jobs_due(
        &self,
        now: u64,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<ScheduledJob>, StoreError>;
    /// Everything not `deleted`, newest first, capped at 1000.
    fn list_all_scheduled_jobs(&self) -> Result<Vec<ScheduledJob>, StoreError>;
    fn update_after_execution(
        &self,
        id: &ScheduledJobId,
        last_run_at: u64,
        execution_id: ExecutionId,
        next_run_at: Option<u64>,
        now: u64,
    ) -> Result<(), StoreError>;
    /// Atomically find-or-create a tracking `ScheduledJob` for a manual
    /// handler invocation, and insert a linked `Execution` (spec §4.A).
    fn create_force_trigger_execution(
        &self,
        handler_name: &str,
        ats_code: &str,
        async_job_id: JobId,
        now: u64,
    ) -> Result<(ScheduledJobId, ExecutionId), StoreError>;
    fn delete_scheduled_job(&self, id: &ScheduledJobId, now: u64) -> Result<(), StoreError>;

    fn create_execution(&self, execution: Execution) -> Result<(), StoreError>;
    fn get_execution(&self, id: &ExecutionId) -> Result<Option<Execution>, StoreError>;
    fn link_execution_async_job(&self, id: &ExecutionId, async_job_id: JobId) -> Result<(), StoreError>;
    fn finish_execution(
        &self,
        id: &ExecutionId,
        status: ExecutionStatus,
        now: u64,
        error_message: Option<String>,
        result_summary: Option<String>,
    ) -> Result<(), StoreError>;
    /// Deletes executions with `started_at` older than `retention_days`
    /// before `now`; cutoff is computed in code, not in a query.
    fn cleanup_old_executions(&self, retention_days: u32, now: u64) -> Result<usize, StoreError>;

    fn create_job(&self, job: Job) -> Result<(), StoreError>;
    fn get_job(&self, id: &JobId) -> Result<Option<Job>, StoreError>;
    fn update_job(&self, job: Job) -> Result<(), StoreError>;
    fn list_jobs(&self, status: Option<JobStatus>, limit: usize) -> Result<Vec<Job>, StoreError>;
    fn list_active_jobs(&self, limit: usize) -> Result<Vec<Job>, StoreError>;
    fn list_tasks_by_parent(&self, parent_id: &JobId) -> Result<Vec<Job>, StoreError>;
    fn find_active_job_by_source_and_handler(
        &self,
        source: &str,
        handler_name: &str,
    ) -> Result<Option<Job>, StoreError>;
    fn find_recent_job_by_source_and_handler(
        &self,
        source: &str,
        handler_name: &str,
        within_ms: u64,
        now: u64,
    ) -> Result<Option<Job>, StoreError>;
    fn delete_job(&self, id: &JobId) -> Result<(), StoreError>;
    fn cleanup_old_jobs(&self, older_than_ms: u64, now: u64) -> Result<usize, StoreError>;

    fn append_task_log(&self, entry: TaskLog) -> Result<(), StoreError>;
    fn list_stages_for_job(&self, job_id: &JobId) -> Result<Vec<StageSummary>, StoreError>;
    fn list_logs_for_task(&self, job_id: &JobId, task_id: &str) -> Result<Vec<TaskLog>, StoreError>;
}

struct Durable {
    wal: Mutex<Wal>,
    checkpointer: Checkpointer,
}

/// Shared implementation behind both [`InMemoryStore`] and [`WalStore`].
pub struct Engine {
    state: Mutex<MaterializedState>,
    durable: Option<Durable>,
}

/// Non-durable store: events only ever live in memory. Used by tests
/// that don't need to exercise the WAL.
pub type InMemoryStore = Engine;

/// Durable store backed by a WAL file plus periodic zstd snapshots.
pub type WalStore = Engine;

impl Engine {
    pub fn in_memory() -> Self {
        Self { state: Mutex::new(MaterializedState::default()), durable: None }
    }

    /// Open (or create) a durable store rooted at `dir`: loads the last
    /// snapshot, then replays every WAL entry written after it.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let (mut state, snapshot_seq) = load_snapshot(dir)?;
        let mut wal = Wal::open(dir.join("wal.log"), snapshot_seq)?;

        while let Some(entry) = wal.next_unprocessed()? {
            state.apply_event(&entry.event);
            wal.mark_processed(entry.seq);
        }

        Ok(Self {
            state: Mutex::new(state),
            durable: Some(Durable { wal: Mutex::new(wal), checkpointer: Checkpointer::new(dir) }),
        })
    }

    /// Snapshot current state and compact the WAL behind it.
    pub fn checkpoint(&self) -> Result<(), StoreError> {
        let Some(durable) = &self.durable else { return Ok(()) };
        let state = self.state.lock();
        let mut wal = durable.wal.lock();
        let seq = wal.processed_seq();
        durable.checkpointer.checkpoint(&state, seq, &mut wal)?;
        Ok(())
    }

    fn record(&self, event: Event) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state.apply_event(&event);
        if let Some(durable) = &self.durable {
            let mut wal = durable.wal.lock();
            let seq = wal.append(&event)?;
            wal.mark_processed(seq);
            if wal.needs_flush() {
                wal.flush()?;
            }
        }
        Ok(())
    }
}

impl Store for Engine {
    fn create_scheduled_job(&self, job: ScheduledJob) -> Result<(), StoreError> {
        self.record(Event::ScheduledJobCreated { job: Box::new(job) })
    }

    fn get_scheduled_job(&self, id: &ScheduledJobId) -> Result<Option<ScheduledJob>, StoreError> {
        Ok(self.state.lock().scheduled_jobs.get(id).cloned())
    }

    fn list_jobs_due(
        &self,
        now: u64,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<ScheduledJob>, StoreError> {
        let state = self.state.lock();
        let mut due: Vec<ScheduledJob> = Vec::new();
        for job in state.scheduled_jobs.values() {
            if cancel.is_cancelled() {
                return Err(StoreError::Cancelled);
            }
            if job.is_due(now) {
                due.push(job.clone());
            }
        }
        // Ties on next_run_at break by insertion order (spec §5).
        due.sort_by_key(|job| {
            let seq = state.scheduled_job_order.iter().position(|id| *id == job.id).unwrap_or(usize::MAX);
            (job.next_run_at.unwrap_or(u64::MAX), seq)
        });
        due.truncate(limit);
        Ok(due)
    }

    fn list_all_scheduled_jobs(&self) -> Result<Vec<ScheduledJob>, StoreError> {
        let state = self.state.lock();
        let mut jobs: Vec<ScheduledJob> = state
            .scheduled_job_order
            .iter()
            .rev()
            .filter_map(|id| state.scheduled_jobs.get(id))
            .filter(|j| j.state.is_listable())
            .cloned()
            .collect();
        jobs.truncate(1000);
        Ok(jobs)
    }

    fn update_after_execution(
        &self,
        id: &ScheduledJobId,
        last_run_at: u64,
        execution_id: ExecutionId,
        next_run_at: Option<u64>,
        now: u64,
    ) -> Result<(), StoreError> {
        self.record(Event::ScheduledJobAdvanced {
            id: *id,
            last_run_at,
            last_execution_id: execution_id,
            next_run_at,
            updated_at: now,
        })
    }

    fn create_force_trigger_execution(
        &self,
        handler_name: &str,
        ats_code: &str,
        async_job_id: JobId,
        now: u64,
    ) -> Result<(ScheduledJobId, ExecutionId), StoreError> {
        let scheduled_job_id = {
            let state = self.state.lock();
            state
                .scheduled_jobs
                .values()
                .find(|j| j.state == ScheduledJobState::Active && j.handler_name == handler_name)
                .or_else(|| {
                    state.scheduled_jobs.values().find(|j| {
                        j.created_from_doc_id.as_deref() == Some(FORCE_TRIGGER_MARKER)
                            && (j.ats_code == ats_code || j.handler_name == handler_name)
                    })
                })
                .map(|j| j.id)
        };

        let scheduled_job_id = match scheduled_job_id {
            Some(id) => id,
            None => {
                let placeholder = ScheduledJob {
                    id: ScheduledJobId::new(),
                    interval_seconds: 0,
                    handler_name: handler_name.to_string(),
                    payload: Vec::new(),
                    source_url: String::new(),
                    ats_code: ats_code.to_string(),
                    next_run_at: None,
                    last_run_at: None,
                    last_execution_id: None,
                    state: ScheduledJobState::Inactive,
                    created_from_doc_id: Some(FORCE_TRIGGER_MARKER.to_string()),
                    metadata: Vec::new(),
                    created_at: now,
                    updated_at: now,
                };
                let id = placeholder.id;
                self.record(Event::ScheduledJobCreated { job: Box::new(placeholder) })?;
                id
            }
        };

        let execution = Execution {
            id: ExecutionId::new(),
            scheduled_job_id,
            async_job_id: Some(async_job_id),
            status: ExecutionStatus::Running,
            started_at: now,
            completed_at: None,
            duration_ms: None,
            logs: None,
            result_summary: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        };
        let execution_id = execution.id;
        self.record(Event::ExecutionStarted { execution: Box::new(execution) })?;

        Ok((scheduled_job_id, execution_id))
    }

    fn delete_scheduled_job(&self, id: &ScheduledJobId, now: u64) -> Result<(), StoreError> {
        self.record(Event::ScheduledJobDeleted { id: *id, updated_at: now })
    }

    fn create_execution(&self, execution: Execution) -> Result<(), StoreError> {
        self.record(Event::ExecutionStarted { execution: Box::new(execution) })
    }

    fn get_execution(&self, id: &ExecutionId) -> Result<Option<Execution>, StoreError> {
        Ok(self.state.lock().executions.get(id).cloned())
    }

    fn link_execution_async_job(&self, id: &ExecutionId, async_job_id: JobId) -> Result<(), StoreError> {
        self.record(Event::ExecutionAsyncJobLinked { id: *id, async_job_id })
    }

    fn finish_execution(
        &self,
        id: &ExecutionId,
        status: ExecutionStatus,
        now: u64,
        error_message: Option<String>,
        result_summary: Option<String>,
    ) -> Result<(), StoreError> {
        let duration_ms = {
            let state = self.state.lock();
            state.executions.get(id).map(|e| now.saturating_sub(e.started_at)).unwrap_or(0)
        };
        self.record(Event::ExecutionFinished {
            id: *id,
            status,
            completed_at: now,
            duration_ms,
            error_message,
            result_summary,
        })
    }

    fn cleanup_old_executions(&self, retention_days: u32, now: u64) -> Result<usize, StoreError> {
        let cutoff = now.saturating_sub(retention_days as u64 * 24 * 60 * 60 * 1000);
        let to_delete: Vec<ExecutionId> = {
            let state = self.state.lock();
            state.executions.values().filter(|e| e.started_at < cutoff).map(|e| e.id).collect()
        };
        for id in &to_delete {
            let mut state = self.state.lock();
            state.executions.remove(id);
        }
        Ok(to_delete.len())
    }

    fn create_job(&self, job: Job) -> Result<(), StoreError> {
        self.record(Event::JobEnqueued { job: Box::new(job) })
    }

    fn get_job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        Ok(self.state.lock().jobs.get(id).cloned())
    }

    fn update_job(&self, job: Job) -> Result<(), StoreError> {
        self.record(Event::JobUpdated { job: Box::new(job) })
    }

    fn list_jobs(&self, status: Option<JobStatus>, limit: usize) -> Result<Vec<Job>, StoreError> {
        let state = self.state.lock();
        let mut jobs: Vec<Job> = state
            .job_order
            .iter()
            .rev()
            .filter_map(|id| state.jobs.get(id))
            .filter(|j| status.map(|s| j.status == s).unwrap_or(true))
            .cloned()
            .collect();
        jobs.truncate(limit);
        Ok(jobs)
    }

    /// Oldest-first, so a worker pool scanning this list for the next job
    /// to dequeue sees true FIFO order (spec §4.C).
    fn list_active_jobs(&self, limit: usize) -> Result<Vec<Job>, StoreError> {
        let state = self.state.lock();
        let mut jobs: Vec<Job> = state
            .job_order
            .iter()
            .filter_map(|id| state.jobs.get(id))
            .filter(|j| j.status.is_active())
            .cloned()
            .collect();
        jobs.truncate(limit);
        Ok(jobs)
    }

    fn list_tasks_by_parent(&self, parent_id: &JobId) -> Result<Vec<Job>, StoreError> {
        let state = self.state.lock();
        Ok(state.jobs.values().filter(|j| j.parent_id == Some(*parent_id)).cloned().collect())
    }

    fn find_active_job_by_source_and_handler(
        &self,
        source: &str,
        handler_name: &str,
    ) -> Result<Option<Job>, StoreError> {
        let state = self.state.lock();
        Ok(state
            .jobs
            .values()
            .find(|j| j.status.is_active() && j.source == source && j.handler_name == handler_name)
            .cloned())
    }

    fn find_recent_job_by_source_and_handler(
        &self,
        source: &str,
        handler_name: &str,
        within_ms: u64,
        now: u64,
    ) -> Result<Option<Job>, StoreError> {
        let cutoff = now.saturating_sub(within_ms);
        let state = self.state.lock();
        Ok(state
            .jobs
            .values()
            .filter(|j| j.source == source && j.handler_name == handler_name && j.created_at >= cutoff)
            .max_by_key(|j| j.created_at)
            .cloned())
    }

    fn delete_job(&self, id: &JobId) -> Result<(), StoreError> {
        self.record(Event::JobDeleted { id: *id })
    }

    fn cleanup_old_jobs(&self, older_than_ms: u64, now: u64) -> Result<usize, StoreError> {
        let cutoff = now.saturating_sub(older_than_ms);
        let to_delete: Vec<JobId> = {
            let state = self.state.lock();
            state
                .jobs
                .values()
                .filter(|j| j.status.is_terminal() && j.updated_at < cutoff)
                .map(|j| j.id)
                .collect()
        };
        for id in &to_delete {
            self.delete_job(id)?;
        }
        Ok(to_delete.len())
    }

    fn append_task_log(&self, entry: TaskLog) -> Result<(), StoreError> {
        self.record(Event::TaskLogAppended { entry: Box::new(entry) })
    }

    fn list_stages_for_job(&self, job_id: &JobId) -> Result<Vec<StageSummary>, StoreError> {
        Ok(list_stages_for_job(&self.state.lock(), job_id))
    }

    fn list_logs_for_task(&self, job_id: &JobId, task_id: &str) -> Result<Vec<TaskLog>, StoreError> {
        Ok(list_logs_for_task(&self.state.lock(), job_id, task_id))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
