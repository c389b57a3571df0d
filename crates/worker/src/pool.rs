// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Worker pool: N tasks pulling queued jobs and dispatching to handlers
//! (spec §4.C).

use std::sync::Arc;
use std::time::Duration;

use qntx_core::Clock;
use qntx_queue::AsyncQueue;
use qntx_storage::Store;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::handler::HandlerRegistry;
use crate::metrics::SystemMetricsSampler;

/// Fallback poll period when no wake signal arrives (handles the case
/// where a job is enqueued by a process that never calls `notify_waiters`,
/// e.g. restored from WAL replay on startup).
const FALLBACK_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// A running pool of worker tasks. Drop or call [`WorkerPool::shutdown`] to
/// stop them.
pub struct WorkerPool {
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
    metrics: SystemMetricsSampler,
}

impl WorkerPool {
    /// Spawns `worker_count` tasks against `queue`, each dispatching
    /// dequeued jobs to `registry`.
    pub fn spawn<S, C>(
        queue: Arc<AsyncQueue<S, C>>,
        registry: Arc<HandlerRegistry>,
        worker_count: usize,
    ) -> Self
    where
        S: Store + Send + Sync + 'static,
        C: Clock + Send + Sync + Clone + 'static,
    {
        let cancel = CancellationToken::new();
        let metrics = SystemMetricsSampler::new(worker_count);
        let mut handles = Vec::with_capacity(worker_count);

        for worker_id in 0..worker_count {
            let queue = queue.clone();
            let registry = registry.clone();
            let metrics = metrics.clone();
            let cancel = cancel.clone();
            let wake = queue.wake_handle();

            handles.push(tokio::spawn(async move {
                tracing::info!(worker_id, "worker started");
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = wake.notified() => {}
                        _ = tokio::time::sleep(FALLBACK_POLL_INTERVAL) => {}
                    }

                    loop {
                        if cancel.is_cancelled() {
                            break;
                        }
                        let job = match queue.dequeue() {
                            Ok(Some(job)) => job,
                            Ok(None) => break,
                            Err(error) => {
                                tracing::error!(worker_id, %error, "dequeue failed");
                                break;
                            }
                        };
                        let _guard = metrics.enter();
                        dispatch_one(&queue, &registry, &cancel, job, worker_id).await;
                    }
                }
                tracing::info!(worker_id, "worker stopped");
            }));
        }

        Self { cancel, handles, metrics }
    }

    pub fn metrics(&self) -> &SystemMetricsSampler {
        &self.metrics
    }

    /// Signals every worker to stop after its current job and waits for
    /// them to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}

async fn dispatch_one<S, C>(
    queue: &AsyncQueue<S, C>,
    registry: &HandlerRegistry,
    cancel: &CancellationToken,
    job: qntx_core::Job,
    worker_id: usize,
) where
    S: Store,
    C: Clock,
{
    let job_id = job.id;
    let Some(handler) = registry.get(&job.handler_name) else {
        tracing::warn!(worker_id, %job_id, handler = %job.handler_name, "no handler registered");
        if let Err(error) = queue.fail(&job_id, format!("no handler registered for '{}'", job.handler_name)) {
            tracing::error!(worker_id, %job_id, %error, "failed to mark job failed");
        }
        return;
    };

    match handler.execute(cancel, &job).await {
        Ok(outcome) => {
            if let Some(progress) = outcome.progress {
                if let Err(error) = queue.report_progress(&job_id, progress) {
                    tracing::error!(worker_id, %job_id, %error, "failed to report progress");
                }
            }
            if let Some(cost_actual) = outcome.cost_actual {
                if let Err(error) = queue.report_cost(&job_id, cost_actual) {
                    tracing::error!(worker_id, %job_id, %error, "failed to report cost");
                }
            }
            if let Err(error) = queue.complete(&job_id) {
                tracing::error!(worker_id, %job_id, %error, "failed to mark job completed");
            }
        }
        Err(message) => {
            tracing::warn!(worker_id, %job_id, handler = %job.handler_name, %message, "handler failed");
            if let Err(error) = queue.fail(&job_id, message) {
                tracing::error!(worker_id, %job_id, %error, "failed to mark job failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
