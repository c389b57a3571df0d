// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Queue service bridge (spec §4.E) — lets a plugin enqueue/inspect async
//! jobs without depending on `qntx-queue` directly. The host wires a real
//! implementation backed by `qntx_queue::AsyncQueue` (see `qntx-host`).

use async_trait::async_trait;
use qntx_core::{Job, JobId, JobStatus};

use crate::error::ServiceError;

#[async_trait]
pub trait ServiceQueue: Send + Sync {
    async fn enqueue(&self, job: Job) -> Result<JobId, ServiceError>;
    async fn get(&self, id: JobId) -> Result<Option<Job>, ServiceError>;
    async fn update(&self, job: Job) -> Result<(), ServiceError>;
    async fn list(&self, status: Option<JobStatus>, limit: usize) -> Result<Vec<Job>, ServiceError>;
}
