// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use qntx_core::{Event, TaskLog};

use super::MaterializedState;

pub(super) fn apply(state: &mut MaterializedState, event: &Event) {
    match event {
        Event::TaskLogAppended { entry } => {
            state.task_logs.entry(entry.job_id).or_default().push((**entry).clone());
        }
        _ => unreachable!("dispatched by MaterializedState::apply_event"),
    }
}

/// One task observed under a stage, with how many log lines it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    pub task_id: String,
    pub log_count: usize,
}

/// A stage and the tasks logged under it, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSummary {
    pub stage: String,
    pub tasks: Vec<TaskSummary>,
}

/// Parse `log.metadata` as a JSON object, falling back to an empty map on
/// malformed input — logs are observability, not truth, so a parse
/// failure here must not be fatal (spec §7, Data integrity exception).
pub fn parsed_metadata(log: &TaskLog) -> serde_json::Map<String, serde_json::Value> {
    log.metadata
        .as_deref()
        .and_then(|raw| serde_json::from_str::<serde_json::Value>(raw).ok())
        .and_then(|v| v.as_object().cloned())
        .unwrap_or_default()
}

/// Group a job's logs by stage (insertion order), then by task within
/// stage. A `task_id: None` entry is reported under the stage's own name
/// as the stage-level pseudo-task.
pub fn list_stages_for_job(state: &MaterializedState, job_id: &qntx_core::JobId) -> Vec<StageSummary> {
    let Some(logs) = state.task_logs.get(job_id) else { return Vec::new() };

    let mut stage_order: Vec<String> = Vec::new();
    let mut task_order: std::collections::HashMap<String, Vec<String>> = std::collections::HashMap::new();
    let mut counts: std::collections::HashMap<(String, String), usize> = std::collections::HashMap::new();

    for log in logs {
        let stage = log.stage.clone().unwrap_or_default();
        if !stage_order.contains(&stage) {
            stage_order.push(stage.clone());
        }
        let task = log.task_id.clone().unwrap_or_else(|| stage.clone());
        let tasks = task_order.entry(stage.clone()).or_default();
        if !tasks.contains(&task) {
            tasks.push(task.clone());
        }
        *counts.entry((stage, task)).or_insert(0) += 1;
    }

    stage_order
        .into_iter()
        .map(|stage| {
            let tasks = task_order
                .get(&stage)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(|task_id| {
                    let log_count = counts.get(&(stage.clone(), task_id.clone())).copied().unwrap_or(0);
                    TaskSummary { task_id, log_count }
                })
                .collect();
            StageSummary { stage, tasks }
        })
        .collect()
}

/// Logs matching `task_id = t`, plus stage-level rows (`task_id IS NULL
/// AND stage = t`), ordered by timestamp ascending.
pub fn list_logs_for_task(state: &MaterializedState, job_id: &qntx_core::JobId, task_id: &str) -> Vec<TaskLog> {
    let Some(logs) = state.task_logs.get(job_id) else { return Vec::new() };

    let mut matching: Vec<TaskLog> = logs
        .iter()
        .filter(|log| {
            log.task_id.as_deref() == Some(task_id)
                || (log.task_id.is_none() && log.stage.as_deref() == Some(task_id))
        })
        .cloned()
        .collect();
    matching.sort_by_key(|log| log.timestamp);
    matching
}
