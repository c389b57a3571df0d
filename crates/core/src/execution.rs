// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! One invocation of a [`crate::ScheduledJob`].

use serde::{Deserialize, Serialize};

use crate::{JobId, ScheduledJobId};

crate::define_id! {
    /// Unique identifier for an execution record.
    pub struct ExecutionId("pex-");
}

/// Status of an [`Execution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Running,
    Completed,
    Failed,
}

crate::simple_display! {
    ExecutionStatus {
        Running => "running",
        Completed => "completed",
        Failed => "failed",
    }
}

impl ExecutionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExecutionStatus::Running)
    }
}

/// One run of a [`crate::ScheduledJob`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    pub id: ExecutionId,
    pub scheduled_job_id: ScheduledJobId,
    pub async_job_id: Option<JobId>,
    pub status: ExecutionStatus,
    pub started_at: u64,
    pub completed_at: Option<u64>,
    pub duration_ms: Option<u64>,
    pub logs: Option<String>,
    pub result_summary: Option<String>,
    pub error_message: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Execution {
    /// Finalize this execution as terminal, filling `completed_at`/`duration_ms`.
    pub fn finish(&mut self, status: ExecutionStatus, now_ms: u64, error: Option<String>) {
        debug_assert!(status.is_terminal());
        self.status = status;
        self.completed_at = Some(now_ms);
        self.duration_ms = Some(now_ms.saturating_sub(self.started_at));
        self.error_message = error;
        self.updated_at = now_ms;
    }
}

crate::builder! {
    pub struct ExecutionBuilder => Execution {
        set {
            scheduled_job_id: ScheduledJobId = ScheduledJobId::new(),
            status: ExecutionStatus = ExecutionStatus::Running,
            started_at: u64 = 0,
            completed_at: Option<u64> = None,
            duration_ms: Option<u64> = None,
            created_at: u64 = 0,
            updated_at: u64 = 0,
        }
        option {
            async_job_id: JobId = None,
            logs: String = None,
            result_summary: String = None,
            error_message: String = None,
        }
        computed {
            id: ExecutionId = ExecutionId::new(),
        }
    }
}

#[cfg(test)]
#[path = "execution_tests.rs"]
mod tests;
