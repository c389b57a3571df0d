// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Async job: a unit of work dispatched to a worker.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for an async job.
    pub struct JobId("job-");
}

/// Status of an async [`Job`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Paused,
    Completed,
    Failed,
    Cancelled,
}

crate::simple_display! {
    JobStatus {
        Queued => "queued",
        Running => "running",
        Paused => "paused",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled)
    }

    /// Dedup and pause/resume consider these "still live".
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Running | JobStatus::Paused)
    }
}

/// Progress counter reported by a handler (or a plugin, over RPC).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: u64,
    pub total: u64,
}

/// A unit of work for a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub handler_name: String,
    /// URL used for the `(source, handler_name)` dedup key.
    pub source: String,
    pub payload: Vec<u8>,
    /// Forms a job tree; children are not auto-cancelled on parent completion.
    pub parent_id: Option<JobId>,
    pub status: JobStatus,
    pub progress: Progress,
    pub cost_actual: Option<f64>,
    pub error: Option<String>,
    pub pause_reason: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Job {
    /// The dedup key this job occupies while active.
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.source, &self.handler_name)
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        into {
            handler_name: String = "handler",
            source: String = "",
        }
        set {
            payload: Vec<u8> = Vec::new(),
            status: JobStatus = JobStatus::Queued,
            progress: Progress = Progress::default(),
            created_at: u64 = 0,
            updated_at: u64 = 0,
        }
        option {
            parent_id: JobId = None,
            cost_actual: f64 = None,
            error: String = None,
            pause_reason: String = None,
        }
        computed {
            id: JobId = JobId::new(),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
