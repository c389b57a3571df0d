// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use qntx_core::JobId;
use qntx_queue::QueueError;

/// Errors surfaced by the worker pool (spec §4.C).
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("no handler registered for job {job_id} (wants '{handler_name}')")]
    HandlerNotFound { job_id: JobId, handler_name: String },

    #[error("handler '{handler_name}' failed for job {job_id}: {message}")]
    HandlerFailed { job_id: JobId, handler_name: String, message: String },
}
