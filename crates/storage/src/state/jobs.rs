// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use qntx_core::Event;

use super::MaterializedState;

pub(super) fn apply(state: &mut MaterializedState, event: &Event) {
    match event {
        Event::JobEnqueued { job } => {
            if let std::collections::hash_map::Entry::Vacant(slot) = state.jobs.entry(job.id) {
                slot.insert((**job).clone());
                state.job_order.push(job.id);
            }
        }
        Event::JobUpdated { job } => {
            state.jobs.insert(job.id, (**job).clone());
        }
        Event::JobDequeued { id, updated_at } => {
            if let Some(job) = state.jobs.get_mut(id) {
                job.status = qntx_core::JobStatus::Running;
                job.updated_at = *updated_at;
            }
        }
        Event::JobStatusChanged { id, status, updated_at } => {
            if let Some(job) = state.jobs.get_mut(id) {
                job.status = *status;
                job.updated_at = *updated_at;
            }
        }
        Event::JobPaused { id, reason, updated_at } => {
            if let Some(job) = state.jobs.get_mut(id) {
                job.status = qntx_core::JobStatus::Paused;
                job.pause_reason = Some(reason.clone());
                job.updated_at = *updated_at;
            }
        }
        Event::JobProgress { id, progress, updated_at } => {
            if let Some(job) = state.jobs.get_mut(id) {
                job.progress = *progress;
                job.updated_at = *updated_at;
            }
        }
        Event::JobFailed { id, error, updated_at } => {
            if let Some(job) = state.jobs.get_mut(id) {
                job.status = qntx_core::JobStatus::Failed;
                job.error = Some(error.clone());
                job.updated_at = *updated_at;
            }
        }
        Event::JobCostReported { id, cost_actual, updated_at } => {
            if let Some(job) = state.jobs.get_mut(id) {
                job.cost_actual = Some(*cost_actual);
                job.updated_at = *updated_at;
            }
        }
        Event::JobDeleted { id } => {
            state.jobs.remove(id);
            state.task_logs.remove(id);
            state.job_order.retain(|existing| existing != id);
        }
        _ => unreachable!("dispatched by MaterializedState::apply_event"),
    }
}
