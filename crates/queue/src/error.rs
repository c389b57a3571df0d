// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use thiserror::Error;

use qntx_core::JobStatus;
use qntx_storage::StoreError;

/// Error taxonomy for the async queue (spec §4.B, §7 Business rule kind).
#[derive(Debug, Error)]
pub enum QueueError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("job {id} not found")]
    NotFound { id: String },

    /// Illegal state transition — message carries both the current and
    /// required state per spec §7.
    #[error("job {id}: cannot {action} from status {current}, requires {required}")]
    InvalidTransition { id: String, action: &'static str, current: JobStatus, required: &'static str },
}
