// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use qntx_core::Event;

use super::MaterializedState;

pub(super) fn apply(state: &mut MaterializedState, event: &Event) {
    match event {
        Event::ExecutionStarted { execution } => {
            state.executions.entry(execution.id).or_insert_with(|| (**execution).clone());
        }
        Event::ExecutionAsyncJobLinked { id, async_job_id } => {
            if let Some(execution) = state.executions.get_mut(id) {
                execution.async_job_id = Some(*async_job_id);
            }
        }
        Event::ExecutionFinished { id, status, completed_at, duration_ms, error_message, result_summary } => {
            if let Some(execution) = state.executions.get_mut(id) {
                execution.status = *status;
                execution.completed_at = Some(*completed_at);
                execution.duration_ms = Some(*duration_ms);
                execution.error_message = error_message.clone();
                execution.result_summary = result_summary.clone();
                execution.updated_at = *completed_at;
            }
        }
        _ => unreachable!("dispatched by MaterializedState::apply_event"),
    }
}
