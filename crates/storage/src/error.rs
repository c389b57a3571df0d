// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

use thiserror::Error;

/// Error taxonomy for the persistence adapter (spec §7, Data integrity
/// kind, plus the operational failures around it).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt data: {0}")]
    Corrupt(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("operation cancelled")]
    Cancelled,
    #[error("wal error: {0}")]
    Wal(#[from] crate::wal::WalError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] crate::snapshot::SnapshotError),
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] crate::checkpoint::CheckpointError),
}
