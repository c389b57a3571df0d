// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Periodic snapshot + WAL compaction.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::snapshot::{Snapshot, SnapshotError};
use crate::state::MaterializedState;
use crate::wal::{Wal, WalError};

/// Load the most recent snapshot for `dir`, if one exists.
///
/// Returns `(MaterializedState::default(), 0)` when no snapshot file is
/// present yet, which is the expected state of a freshly created store.
pub fn load_snapshot(dir: &Path) -> Result<(MaterializedState, u64), SnapshotError> {
    let path = snapshot_path(dir);
    if !path.exists() {
        return Ok((MaterializedState::default(), 0));
    }
    let snapshot = Snapshot::read_from(&path)?;
    Ok((snapshot.state, snapshot.seq))
}

fn snapshot_path(dir: &Path) -> PathBuf {
    dir.join("snapshot.zst")
}

/// Writes snapshots and compacts the WAL behind them.
pub struct Checkpointer {
    dir: PathBuf,
}

impl Checkpointer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write a snapshot of `state` at `seq`, then truncate the WAL to
    /// everything after it.
    pub fn checkpoint(
        &self,
        state: &MaterializedState,
        seq: u64,
        wal: &mut Wal,
    ) -> Result<(), CheckpointError> {
        std::fs::create_dir_all(&self.dir)?;
        let snapshot = Snapshot::new(seq, state.clone(), Utc::now());
        snapshot.write_to(&snapshot_path(&self.dir))?;
        wal.truncate_before(seq + 1)?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("wal error: {0}")]
    Wal(#[from] WalError),
}
