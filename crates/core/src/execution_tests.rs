// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use super::*;

#[test]
fn finish_sets_terminal_fields() {
    let mut execution = Execution::builder().started_at(1_000).build();
    execution.finish(ExecutionStatus::Completed, 1_500, None);
    assert_eq!(execution.status, ExecutionStatus::Completed);
    assert_eq!(execution.completed_at, Some(1_500));
    assert_eq!(execution.duration_ms, Some(500));
    assert_eq!(execution.updated_at, 1_500);
    assert!(execution.error_message.is_none());
}

#[test]
fn finish_records_error_message_on_failure() {
    let mut execution = Execution::builder().started_at(0).build();
    execution.finish(ExecutionStatus::Failed, 100, Some("boom".to_string()));
    assert_eq!(execution.status, ExecutionStatus::Failed);
    assert_eq!(execution.error_message.as_deref(), Some("boom"));
}

#[test]
fn duration_saturates_instead_of_underflowing() {
    let mut execution = Execution::builder().started_at(1_000).build();
    execution.finish(ExecutionStatus::Completed, 500, None);
    assert_eq!(execution.duration_ms, Some(0));
}

#[test]
fn running_is_not_terminal_but_completed_and_failed_are() {
    assert!(!ExecutionStatus::Running.is_terminal());
    assert!(ExecutionStatus::Completed.is_terminal());
    assert!(ExecutionStatus::Failed.is_terminal());
}

#[test]
fn builder_overrides_scheduled_job_id() {
    let id = ScheduledJobId::new();
    let execution = Execution::builder().scheduled_job_id(id).build();
    assert_eq!(execution.scheduled_job_id, id);
}

#[test]
fn builder_links_async_job_via_option_setter() {
    let job_id = JobId::new();
    let execution = Execution::builder().async_job_id(job_id).build();
    assert_eq!(execution.async_job_id, Some(job_id));
}
