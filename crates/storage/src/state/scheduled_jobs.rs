// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use qntx_core::Event;

use super::MaterializedState;

pub(super) fn apply(state: &mut MaterializedState, event: &Event) {
    match event {
        Event::ScheduledJobCreated { job } => {
            if let std::collections::hash_map::Entry::Vacant(slot) = state.scheduled_jobs.entry(job.id) {
                slot.insert((**job).clone());
                state.scheduled_job_order.push(job.id);
            }
        }
        Event::ScheduledJobStateChanged { id, state: new_state, updated_at } => {
            if let Some(job) = state.scheduled_jobs.get_mut(id) {
                job.state = *new_state;
                job.updated_at = *updated_at;
            }
        }
        Event::ScheduledJobAdvanced { id, last_run_at, last_execution_id, next_run_at, updated_at } => {
            if let Some(job) = state.scheduled_jobs.get_mut(id) {
                job.last_run_at = Some(*last_run_at);
                job.last_execution_id = Some(*last_execution_id);
                job.next_run_at = *next_run_at;
                job.updated_at = *updated_at;
            }
        }
        Event::ScheduledJobDeleted { id, updated_at } => {
            if let Some(job) = state.scheduled_jobs.get_mut(id) {
                job.state = qntx_core::ScheduledJobState::Deleted;
                job.updated_at = *updated_at;
            }
        }
        _ => unreachable!("dispatched by MaterializedState::apply_event"),
    }
}
