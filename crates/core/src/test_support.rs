// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{
    Event, Execution, ExecutionId, ExecutionStatus, Job, JobId, Progress, ScheduledJob,
    ScheduledJobId, ScheduledJobState,
};

/// Proptest strategies for core state machine types.
pub mod strategies {
    use crate::JobStatus;
    use proptest::prelude::*;

    pub fn arb_job_status() -> impl Strategy<Value = JobStatus> {
        prop_oneof![
            Just(JobStatus::Queued),
            Just(JobStatus::Running),
            Just(JobStatus::Paused),
            Just(JobStatus::Completed),
            Just(JobStatus::Failed),
            Just(JobStatus::Cancelled),
        ]
    }
}

pub fn scheduled_job_created_event(handler: &str, source: &str) -> Event {
    let job = ScheduledJob::builder()
        .handler_name(handler)
        .source_url(source)
        .next_run_at(Some(1_000_000))
        .build();
    Event::ScheduledJobCreated { job: Box::new(job) }
}

pub fn scheduled_job_advanced_event(
    id: ScheduledJobId,
    last_run_at: u64,
    next_run_at: Option<u64>,
) -> Event {
    Event::ScheduledJobAdvanced {
        id,
        last_run_at,
        last_execution_id: ExecutionId::new(),
        next_run_at,
        updated_at: last_run_at,
    }
}

pub fn execution_started_event(scheduled_job_id: ScheduledJobId, started_at: u64) -> Event {
    let execution = Execution::builder()
        .scheduled_job_id(scheduled_job_id)
        .started_at(started_at)
        .created_at(started_at)
        .updated_at(started_at)
        .build();
    Event::ExecutionStarted { execution: Box::new(execution) }
}

pub fn execution_finished_event(id: ExecutionId, status: ExecutionStatus, at: u64) -> Event {
    Event::ExecutionFinished {
        id,
        status,
        completed_at: at,
        duration_ms: 0,
        error_message: None,
        result_summary: None,
    }
}

pub fn job_enqueued_event(handler: &str, source: &str) -> Event {
    let job = Job::builder().handler_name(handler).source(source).build();
    Event::JobEnqueued { job: Box::new(job) }
}

pub fn job_status_changed_event(id: JobId, status: crate::JobStatus, at: u64) -> Event {
    Event::JobStatusChanged { id, status, updated_at: at }
}

pub fn job_progress_event(id: JobId, current: u64, total: u64, at: u64) -> Event {
    Event::JobProgress { id, progress: Progress { current, total }, updated_at: at }
}

pub fn scheduled_job_deleted_event(id: ScheduledJobId, at: u64) -> Event {
    Event::ScheduledJobDeleted { id, updated_at: at }
}

pub fn job_deleted_event(id: JobId) -> Event {
    Event::JobDeleted { id }
}

pub fn scheduled_job_state_changed_event(
    id: ScheduledJobId,
    state: ScheduledJobState,
    at: u64,
) -> Event {
    Event::ScheduledJobStateChanged { id, state, updated_at: at }
}
