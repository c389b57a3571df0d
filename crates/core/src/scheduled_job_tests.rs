// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use super::*;

#[test]
fn builder_defaults_are_active_and_due() {
    let job = ScheduledJob::builder().build();
    assert_eq!(job.state, ScheduledJobState::Active);
    assert!(job.is_due(0));
}

#[test]
fn not_due_when_next_run_is_in_the_future() {
    let job = ScheduledJob::builder().next_run_at(Some(1_000)).build();
    assert!(!job.is_due(500));
    assert!(job.is_due(1_000));
    assert!(job.is_due(1_500));
}

#[test]
fn not_due_when_next_run_is_none() {
    let job = ScheduledJob::builder().next_run_at(None).build();
    assert!(!job.is_due(u64::MAX));
}

#[test]
fn not_due_when_paused_or_deleted() {
    let paused = ScheduledJob::builder().state(ScheduledJobState::Paused).build();
    assert!(!paused.is_due(0));
    let deleted = ScheduledJob::builder().state(ScheduledJobState::Deleted).build();
    assert!(!deleted.is_due(0));
}

#[test]
fn force_trigger_placeholder_detected_by_marker() {
    let placeholder = ScheduledJob::builder()
        .created_from_doc_id(FORCE_TRIGGER_MARKER)
        .build();
    assert!(placeholder.is_force_trigger_placeholder());

    let regular = ScheduledJob::builder().created_from_doc_id("doc-123").build();
    assert!(!regular.is_force_trigger_placeholder());

    let none = ScheduledJob::builder().build();
    assert!(!none.is_force_trigger_placeholder());
}

#[test]
fn deleted_state_is_not_listable() {
    assert!(!ScheduledJobState::Deleted.is_listable());
    assert!(ScheduledJobState::Active.is_listable());
    assert!(ScheduledJobState::Paused.is_listable());
    assert!(ScheduledJobState::Stopping.is_listable());
    assert!(ScheduledJobState::Inactive.is_listable());
}

#[test]
fn state_display_matches_serde_rename() {
    assert_eq!(ScheduledJobState::Active.to_string(), "active");
    assert_eq!(ScheduledJobState::Stopping.to_string(), "stopping");
}

#[test]
fn builder_assigns_unique_ids() {
    let a = ScheduledJob::builder().build();
    let b = ScheduledJob::builder().build();
    assert_ne!(a.id, b.id);
}
