// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Events applied to `qntx_storage::MaterializedState`.
//!
//! Every mutation to a `ScheduledJob`, `Execution`, `Job`, or `TaskLog` is
//! represented as an `Event` before it touches in-memory state, so the WAL
//! (`qntx_storage::wal`) can replay it verbatim after a restart. Handlers
//! that apply events must be idempotent: replay may apply the same event
//! twice (once for immediate visibility, once during recovery).

use serde::{Deserialize, Serialize};

use crate::{ExecutionId, ExecutionStatus, JobId, JobStatus, Progress, ScheduledJobId, TaskLog};

/// Events that mutate the materialized state.
///
/// Serializes as `{"type": "scheduled_job:created", ...}`; unknown tags are
/// a deserialization error rather than silently dropped, since a dropped
/// WAL entry is a correctness bug, not a forward-compat no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "scheduled_job:created")]
    ScheduledJobCreated { job: Box<crate::ScheduledJob> },

    #[serde(rename = "scheduled_job:state_changed")]
    ScheduledJobStateChanged {
        id: ScheduledJobId,
        state: crate::ScheduledJobState,
        updated_at: u64,
    },

    /// Atomic advance of the schedule after enqueueing a run (spec §4.A
    /// `update_after_execution`).
    #[serde(rename = "scheduled_job:advanced")]
    ScheduledJobAdvanced {
        id: ScheduledJobId,
        last_run_at: u64,
        last_execution_id: ExecutionId,
        next_run_at: Option<u64>,
        updated_at: u64,
    },

    #[serde(rename = "scheduled_job:deleted")]
    ScheduledJobDeleted { id: ScheduledJobId, updated_at: u64 },

    #[serde(rename = "execution:started")]
    ExecutionStarted { execution: Box<crate::Execution> },

    #[serde(rename = "execution:async_job_linked")]
    ExecutionAsyncJobLinked { id: ExecutionId, async_job_id: JobId },

    #[serde(rename = "execution:finished")]
    ExecutionFinished {
        id: ExecutionId,
        status: ExecutionStatus,
        completed_at: u64,
        duration_ms: u64,
        error_message: Option<String>,
        result_summary: Option<String>,
    },

    #[serde(rename = "job:enqueued")]
    JobEnqueued { job: Box<crate::Job> },

    /// Wholesale replacement, for callers (like the plugin proxy handler)
    /// that update several fields of a job at once instead of going
    /// through a single-field event.
    #[serde(rename = "job:updated")]
    JobUpdated { job: Box<crate::Job> },

    #[serde(rename = "job:dequeued")]
    JobDequeued { id: JobId, updated_at: u64 },

    #[serde(rename = "job:status_changed")]
    JobStatusChanged { id: JobId, status: JobStatus, updated_at: u64 },

    #[serde(rename = "job:paused")]
    JobPaused { id: JobId, reason: String, updated_at: u64 },

    #[serde(rename = "job:progress")]
    JobProgress { id: JobId, progress: Progress, updated_at: u64 },

    #[serde(rename = "job:failed")]
    JobFailed { id: JobId, error: String, updated_at: u64 },

    #[serde(rename = "job:cost_reported")]
    JobCostReported { id: JobId, cost_actual: f64, updated_at: u64 },

    #[serde(rename = "job:deleted")]
    JobDeleted { id: JobId },

    #[serde(rename = "task_log:appended")]
    TaskLogAppended { entry: Box<TaskLog> },
}

impl Event {
    /// One-line summary for tracing, in the teacher's `log_summary` idiom.
    pub fn log_summary(&self) -> String {
        match self {
            Event::ScheduledJobCreated { job } => {
                format!("scheduled_job:created id={} handler={}", job.id, job.handler_name)
            }
            Event::ScheduledJobStateChanged { id, state, .. } => {
                format!("scheduled_job:state_changed id={id} state={state}")
            }
            Event::ScheduledJobAdvanced { id, next_run_at, .. } => {
                format!("scheduled_job:advanced id={id} next_run_at={next_run_at:?}")
            }
            Event::ScheduledJobDeleted { id, .. } => format!("scheduled_job:deleted id={id}"),
            Event::ExecutionStarted { execution } => {
                format!(
                    "execution:started id={} scheduled_job_id={}",
                    execution.id, execution.scheduled_job_id
                )
            }
            Event::ExecutionAsyncJobLinked { id, async_job_id } => {
                format!("execution:async_job_linked id={id} async_job_id={async_job_id}")
            }
            Event::ExecutionFinished { id, status, .. } => {
                format!("execution:finished id={id} status={status}")
            }
            Event::JobEnqueued { job } => {
                format!("job:enqueued id={} handler={} source={}", job.id, job.handler_name, job.source)
            }
            Event::JobUpdated { job } => format!("job:updated id={}", job.id),
            Event::JobDequeued { id, .. } => format!("job:dequeued id={id}"),
            Event::JobStatusChanged { id, status, .. } => {
                format!("job:status_changed id={id} status={status}")
            }
            Event::JobPaused { id, reason, .. } => format!("job:paused id={id} reason={reason}"),
            Event::JobProgress { id, progress, .. } => {
                format!("job:progress id={id} current={} total={}", progress.current, progress.total)
            }
            Event::JobFailed { id, error, .. } => format!("job:failed id={id} error={error}"),
            Event::JobCostReported { id, cost_actual, .. } => {
                format!("job:cost_reported id={id} cost={cost_actual}")
            }
            Event::JobDeleted { id } => format!("job:deleted id={id}"),
            Event::TaskLogAppended { entry } => {
                format!("task_log:appended job_id={} stage={:?}", entry.job_id, entry.stage)
            }
        }
    }
}
