// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Per-stage, per-task log entries attached to an async [`crate::Job`].

use serde::{Deserialize, Serialize};

use crate::JobId;

/// Severity of a [`TaskLog`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

crate::simple_display! {
    LogLevel {
        Debug => "debug",
        Info => "info",
        Warn => "warn",
        Error => "error",
    }
}

/// A single log line emitted during a job's execution.
///
/// A `task_id` of `None` is a stage-level entry, reported under the stage's
/// own name as a pseudo-task (see `qntx_storage::task_logs`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskLog {
    pub job_id: JobId,
    pub stage: Option<String>,
    pub task_id: Option<String>,
    pub timestamp: u64,
    pub level: LogLevel,
    pub message: String,
    /// Raw JSON; malformed metadata is treated as empty rather than fatal.
    pub metadata: Option<String>,
}

crate::builder! {
    pub struct TaskLogBuilder => TaskLog {
        into {
            message: String = "",
        }
        set {
            job_id: JobId = JobId::new(),
            timestamp: u64 = 0,
            level: LogLevel = LogLevel::Info,
        }
        option {
            stage: String = None,
            task_id: String = None,
            metadata: String = None,
        }
    }
}
