// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Recurring work definition materialized into async jobs by Pulse.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a scheduled (recurring) job.
    pub struct ScheduledJobId("spj-");
}

/// Synthetic `created_from_doc_id` marker used for force-trigger placeholders.
///
/// A placeholder tracks ad-hoc handler invocations that were never declared
/// as a recurring schedule. See [`ScheduledJob::is_force_trigger_placeholder`].
pub const FORCE_TRIGGER_MARKER: &str = "__force_trigger__";

/// Lifecycle state of a [`ScheduledJob`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduledJobState {
    Active,
    Paused,
    Stopping,
    Inactive,
    /// Soft-delete: excluded from listings, never physically removed.
    Deleted,
}

crate::simple_display! {
    ScheduledJobState {
        Active => "active",
        Paused => "paused",
        Stopping => "stopping",
        Inactive => "inactive",
        Deleted => "deleted",
    }
}

impl ScheduledJobState {
    pub fn is_listable(&self) -> bool {
        !matches!(self, ScheduledJobState::Deleted)
    }
}

/// A recurring work definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledJob {
    pub id: ScheduledJobId,
    /// Seconds between runs. `0` means one-shot (never rescheduled).
    pub interval_seconds: u64,
    /// Resolves to an async handler the worker pool dispatches to.
    pub handler_name: String,
    /// Opaque payload, typically JSON.
    pub payload: Vec<u8>,
    /// Used for the `(source_url, handler_name)` dedup key.
    pub source_url: String,
    /// Original declarative form, kept for display only.
    pub ats_code: String,
    pub next_run_at: Option<u64>,
    pub last_run_at: Option<u64>,
    pub last_execution_id: Option<crate::ExecutionId>,
    pub state: ScheduledJobState,
    pub created_from_doc_id: Option<String>,
    pub metadata: Vec<u8>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl ScheduledJob {
    pub fn is_force_trigger_placeholder(&self) -> bool {
        self.created_from_doc_id.as_deref() == Some(FORCE_TRIGGER_MARKER)
    }

    /// Whether the ticker should consider this job for materialization.
    pub fn is_due(&self, now_ms: u64) -> bool {
        self.state == ScheduledJobState::Active
            && self.next_run_at.is_some_and(|t| t <= now_ms)
    }
}

crate::builder! {
    pub struct ScheduledJobBuilder => ScheduledJob {
        into {
            handler_name: String = "handler",
            source_url: String = "",
            ats_code: String = "",
        }
        set {
            interval_seconds: u64 = 60,
            payload: Vec<u8> = Vec::new(),
            next_run_at: Option<u64> = Some(0),
            last_run_at: Option<u64> = None,
            last_execution_id: Option<crate::ExecutionId> = None,
            state: ScheduledJobState = ScheduledJobState::Active,
            created_from_doc_id: Option<String> = None,
            metadata: Vec<u8> = Vec::new(),
            created_at: u64 = 0,
            updated_at: u64 = 0,
        }
        computed {
            id: ScheduledJobId = ScheduledJobId::new(),
        }
    }
}

#[cfg(test)]
#[path = "scheduled_job_tests.rs"]
mod tests;
