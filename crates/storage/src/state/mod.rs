// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Materialized state built from WAL replay.

mod executions;
mod jobs;
mod scheduled_jobs;
mod task_logs;

pub use task_logs::{list_logs_for_task, list_stages_for_job, parsed_metadata, StageSummary, TaskSummary};

use std::collections::HashMap;

use qntx_core::{Event, Execution, ExecutionId, Job, JobId, ScheduledJob, ScheduledJobId, TaskLog};
use serde::{Deserialize, Serialize};

/// In-memory projection of every event applied so far.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MaterializedState {
    pub scheduled_jobs: HashMap<ScheduledJobId, ScheduledJob>,
    pub executions: HashMap<ExecutionId, Execution>,
    pub jobs: HashMap<JobId, Job>,
    /// Entries for a job, in append order (oldest first).
    pub task_logs: HashMap<JobId, Vec<TaskLog>>,
    /// `jobs`/`scheduled_jobs` are hash maps with no iteration order of
    /// their own; these record creation order so queries can break ties
    /// deterministically (spec §5: "ties broken by insertion order").
    pub job_order: Vec<JobId>,
    pub scheduled_job_order: Vec<ScheduledJobId>,
}

impl MaterializedState {
    /// Apply an event to derive state changes.
    ///
    /// Event handlers must be idempotent: the same event may be applied
    /// twice, once for immediate visibility and once during WAL replay.
    pub fn apply_event(&mut self, event: &Event) {
        match event {
            Event::ScheduledJobCreated { .. }
            | Event::ScheduledJobStateChanged { .. }
            | Event::ScheduledJobAdvanced { .. }
            | Event::ScheduledJobDeleted { .. } => scheduled_jobs::apply(self, event),

            Event::ExecutionStarted { .. }
            | Event::ExecutionAsyncJobLinked { .. }
            | Event::ExecutionFinished { .. } => executions::apply(self, event),

            Event::JobEnqueued { .. }
            | Event::JobUpdated { .. }
            | Event::JobDequeued { .. }
            | Event::JobStatusChanged { .. }
            | Event::JobPaused { .. }
            | Event::JobProgress { .. }
            | Event::JobFailed { .. }
            | Event::JobCostReported { .. }
            | Event::JobDeleted { .. } => jobs::apply(self, event),

            Event::TaskLogAppended { .. } => task_logs::apply(self, event),
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
