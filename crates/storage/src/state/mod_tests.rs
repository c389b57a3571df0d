// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use super::*;
use qntx_core::test_support::{
    job_enqueued_event, job_progress_event, job_status_changed_event, scheduled_job_advanced_event,
    scheduled_job_created_event,
};
use qntx_core::{ExecutionId, JobId, JobStatus, Progress};

#[test]
fn scheduled_job_created_is_idempotent() {
    let mut state = MaterializedState::default();
    let event = scheduled_job_created_event("fetch_doc", "https://example.com");
    state.apply_event(&event);
    state.apply_event(&event);
    assert_eq!(state.scheduled_jobs.len(), 1);
}

#[test]
fn scheduled_job_advanced_updates_next_run() {
    let mut state = MaterializedState::default();
    let created = scheduled_job_created_event("fetch_doc", "https://example.com");
    state.apply_event(&created);
    let id = *state.scheduled_jobs.keys().next().unwrap();

    let advanced = scheduled_job_advanced_event(id, 1_000, Some(2_000));
    state.apply_event(&advanced);

    let job = &state.scheduled_jobs[&id];
    assert_eq!(job.last_run_at, Some(1_000));
    assert_eq!(job.next_run_at, Some(2_000));
}

#[test]
fn job_progress_then_status_change_applies_in_order() {
    let mut state = MaterializedState::default();
    let event = job_enqueued_event("fetch_doc", "https://example.com");
    state.apply_event(&event);
    let id = *state.jobs.keys().next().unwrap();

    state.apply_event(&job_progress_event(id, 1, 10, 500));
    state.apply_event(&job_status_changed_event(id, JobStatus::Running, 600));

    let job = &state.jobs[&id];
    assert_eq!(job.progress, Progress { current: 1, total: 10 });
    assert_eq!(job.status, JobStatus::Running);
}

#[test]
fn unknown_ids_are_ignored_not_panicking() {
    let mut state = MaterializedState::default();
    state.apply_event(&job_status_changed_event(JobId::new(), JobStatus::Running, 0));
    state.apply_event(&scheduled_job_advanced_event(
        qntx_core::ScheduledJobId::new(),
        0,
        None,
    ));
    let _ = ExecutionId::new();
}
