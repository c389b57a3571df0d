// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! The Pulse ticker: materializes due `ScheduledJob`s into async `Job`s
//! (spec §4.D).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use qntx_core::{Clock, Execution, ExecutionId, ExecutionStatus, Job, JobId, JobStatus, LogLevel, Progress, ScheduledJob, TaskLog};
use qntx_queue::AsyncQueue;
use qntx_storage::Store;
use qntx_worker::SystemMetricsSampler;
use tokio_util::sync::CancellationToken;

use crate::broadcaster::{NoopBroadcaster, PulseBroadcaster};
use crate::error::PulseError;
use crate::heartbeat::{countdown, heartbeat_line};

/// How often (in ticks) the ticker sweeps old executions. At the default
/// one-second tick this is once an hour.
const CLEANUP_INTERVAL_TICKS: u64 = 3600;

/// How many due jobs are materialized per tick (spec §4.A list_jobs_due cap).
const DUE_JOBS_PER_TICK: usize = 100;

pub struct Ticker<S: Store, C: Clock> {
    store: Arc<S>,
    queue: Arc<AsyncQueue<S, C>>,
    clock: C,
    metrics: SystemMetricsSampler,
    broadcaster: Arc<dyn PulseBroadcaster>,
    tick_interval: Duration,
    execution_retention_days: u32,
    cancel: CancellationToken,
    tick_count: AtomicUsize,
    last_active: AtomicUsize,
}

impl<S: Store, C: Clock> Ticker<S, C> {
    pub fn new(
        store: Arc<S>,
        queue: Arc<AsyncQueue<S, C>>,
        clock: C,
        metrics: SystemMetricsSampler,
        execution_retention_days: u32,
    ) -> Self {
        Self {
            store,
            queue,
            clock,
            metrics,
            broadcaster: Arc::new(NoopBroadcaster),
            tick_interval: Duration::from_secs(1),
            execution_retention_days,
            cancel: CancellationToken::new(),
            tick_count: AtomicUsize::new(0),
            // usize::MAX forces the first tick's heartbeat to always log.
            last_active: AtomicUsize::new(usize::MAX),
        }
    }

    pub fn with_broadcaster(mut self, broadcaster: Arc<dyn PulseBroadcaster>) -> Self {
        self.broadcaster = broadcaster;
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs until cancelled, sleeping `tick_interval` between ticks.
    pub async fn run(&self) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.tick_interval) => {}
            }
            if let Err(error) = self.tick() {
                tracing::error!(%error, "pulse tick failed");
            }
        }
    }

    /// One full tick: heartbeat, due-job materialization, periodic cleanup.
    /// Exposed separately from `run` so tests can drive ticks deterministically.
    pub fn tick(&self) -> Result<(), PulseError> {
        let tick_number = self.tick_count.fetch_add(1, Ordering::SeqCst) as u64 + 1;
        let now = self.clock.epoch_ms();

        self.log_heartbeat_if_changed(now)?;

        for scheduled in self.store.list_jobs_due(now, DUE_JOBS_PER_TICK, &self.cancel)? {
            if self.cancel.is_cancelled() {
                break;
            }
            self.execute_scheduled_job(&scheduled, now)?;
        }

        if tick_number % CLEANUP_INTERVAL_TICKS == 0 {
            match self.store.cleanup_old_executions(self.execution_retention_days, now) {
                Ok(deleted) if deleted > 0 => {
                    tracing::info!(deleted, "cleaned up old executions");
                }
                Ok(_) => {}
                Err(error) => tracing::error!(%error, "execution cleanup failed"),
            }
        }

        Ok(())
    }

    fn log_heartbeat_if_changed(&self, now: u64) -> Result<(), PulseError> {
        let counts = self.queue.get_job_counts()?;
        let active = counts.active();
        if self.last_active.swap(active, Ordering::SeqCst) == active {
            return Ok(());
        }
        let next = self.store.list_jobs_due(now, 1, &self.cancel)?;
        let next_due_in = countdown(now, next.first().and_then(|j| j.next_run_at));
        tracing::info!("{}", heartbeat_line(active, &next_due_in, &self.metrics.sample()));
        Ok(())
    }

    /// Materializes one due `ScheduledJob` into an `Execution` and, on
    /// success, an async `Job` (spec §4.D `execute_scheduled_job`).
    fn execute_scheduled_job(&self, scheduled: &ScheduledJob, now: u64) -> Result<(), PulseError> {
        let execution = Execution {
            id: ExecutionId::new(),
            scheduled_job_id: scheduled.id,
            async_job_id: None,
            status: ExecutionStatus::Running,
            started_at: now,
            completed_at: None,
            duration_ms: None,
            logs: None,
            result_summary: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        };
        let execution_id = execution.id;
        self.store.create_execution(execution.clone())?;
        self.broadcaster.execution_started(&execution);

        match self.materialize_job(scheduled, now, execution_id) {
            Ok(()) => {
                self.store.finish_execution(&execution_id, ExecutionStatus::Completed, now, None, None)?;
                let mut finished = execution;
                finished.finish(ExecutionStatus::Completed, now, None);
                self.broadcaster.execution_completed(&finished);
            }
            Err(message) => {
                self.store.finish_execution(
                    &execution_id,
                    ExecutionStatus::Failed,
                    now,
                    Some(message.clone()),
                    None,
                )?;
                let mut finished = execution;
                finished.finish(ExecutionStatus::Failed, now, Some(message.clone()));
                self.broadcaster.execution_failed(&finished, &message);
            }
        }
        Ok(())
    }

    /// Steps 2-5 of `execute_scheduled_job`: refuse an empty handler,
    /// resolve the payload, dedup-or-enqueue, then advance the schedule.
    /// Failures here are caught by the caller and recorded on the
    /// `Execution` rather than aborting the tick.
    fn materialize_job(&self, scheduled: &ScheduledJob, now: u64, execution_id: ExecutionId) -> Result<(), String> {
        if scheduled.handler_name.is_empty() {
            return Err("scheduled job has no handler_name".to_string());
        }

        let payload = resolve_payload(&scheduled.payload, scheduled.last_run_at);

        let job_id = match self
            .queue
            .find_active_job_by_source_and_handler(&scheduled.source_url, &scheduled.handler_name)
            .map_err(|e| e.to_string())?
        {
            Some(existing) => existing.id,
            None => {
                let job = Job {
                    id: JobId::new(),
                    handler_name: scheduled.handler_name.clone(),
                    source: scheduled.source_url.clone(),
                    payload,
                    parent_id: None,
                    status: JobStatus::Queued,
                    progress: Progress::default(),
                    cost_actual: None,
                    error: None,
                    pause_reason: None,
                    created_at: now,
                    updated_at: now,
                };
                let job_id = self.queue.enqueue(job).map_err(|e| e.to_string())?;
                // Actor threading (`pulse:{scheduled_job.id}`) has no column on
                // `Job`; it is recorded as a stage-level task log instead.
                self.store
                    .append_task_log(TaskLog {
                        job_id,
                        stage: Some("pulse".to_string()),
                        task_id: None,
                        timestamp: now,
                        level: LogLevel::Info,
                        message: format!("enqueued by pulse:{}", scheduled.id),
                        metadata: None,
                    })
                    .map_err(|e| e.to_string())?;
                job_id
            }
        };

        self.store.link_execution_async_job(&execution_id, job_id).map_err(|e| e.to_string())?;

        let next_run_at = if scheduled.interval_seconds > 0 {
            Some(now + scheduled.interval_seconds * 1000)
        } else {
            None
        };
        self.store
            .update_after_execution(&scheduled.id, now, execution_id, next_run_at, now)
            .map_err(|e| e.to_string())?;

        Ok(())
    }
}

/// Substitutes `"since": "last_run"` with the schedule's `last_run_at`, or
/// drops the key on a first run. Anything else (including non-JSON
/// payloads) passes through unchanged (spec §4.D step 3).
fn resolve_payload(payload: &[u8], last_run_at: Option<u64>) -> Vec<u8> {
    let Ok(mut value) = serde_json::from_slice::<serde_json::Value>(payload) else {
        return payload.to_vec();
    };
    if let Some(obj) = value.as_object_mut() {
        if obj.get("since").and_then(|v| v.as_str()) == Some("last_run") {
            match last_run_at {
                Some(ts) => {
                    obj.insert("since".to_string(), serde_json::Value::from(ts));
                }
                None => {
                    obj.remove("since");
                }
            }
        }
    }
    serde_json::to_vec(&value).unwrap_or_else(|_| payload.to_vec())
}

#[cfg(test)]
#[path = "ticker_tests.rs"]
mod tests;
