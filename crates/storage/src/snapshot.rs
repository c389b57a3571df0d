// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Snapshot persistence for crash recovery.
//!
//! A snapshot is the complete materialized state at a point in time,
//! identified by the WAL sequence number it was taken at. Recovery loads
//! the snapshot and replays WAL entries after that sequence rather than
//! replaying the whole log from the beginning.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::MaterializedState;

pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("zstd error: {0}")]
    Zstd(std::io::Error),
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
}

/// A zstd-compressed point-in-time copy of [`MaterializedState`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "v")]
    pub version: u32,
    /// WAL sequence number at the time this snapshot was taken.
    pub seq: u64,
    pub state: MaterializedState,
    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(seq: u64, state: MaterializedState, created_at: DateTime<Utc>) -> Self {
        Self { version: CURRENT_SNAPSHOT_VERSION, seq, state, created_at }
    }

    /// Serialize to JSON and zstd-compress it, writing atomically via a
    /// temp file + rename so a crash mid-write never truncates a prior
    /// valid snapshot.
    pub fn write_to(&self, path: &Path) -> Result<(), SnapshotError> {
        if self.version != CURRENT_SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }
        let json = serde_json::to_vec(self)?;
        let compressed = zstd::encode_all(json.as_slice(), 0).map_err(SnapshotError::Zstd)?;

        let tmp = path.with_extension("tmp");
        {
            let mut f = File::create(&tmp)?;
            f.write_all(&compressed)?;
            f.flush()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self, SnapshotError> {
        let mut compressed = Vec::new();
        File::open(path)?.read_to_end(&mut compressed)?;
        let json = zstd::decode_all(compressed.as_slice()).map_err(SnapshotError::Zstd)?;
        let snapshot: Snapshot = serde_json::from_slice(&json)?;
        if snapshot.version != CURRENT_SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }
        Ok(snapshot)
    }
}

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`. The
/// oldest backup is removed when the limit is reached.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }

    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_zstd() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.zst");
        let snapshot = Snapshot::new(42, MaterializedState::default(), Utc::now());
        snapshot.write_to(&path).unwrap();

        let back = Snapshot::read_from(&path).unwrap();
        assert_eq!(back.seq, 42);
        assert_eq!(back.version, CURRENT_SNAPSHOT_VERSION);
    }

    #[test]
    fn rejects_future_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.zst");
        let mut snapshot = Snapshot::new(1, MaterializedState::default(), Utc::now());
        snapshot.version = CURRENT_SNAPSHOT_VERSION + 1;
        assert!(snapshot.write_to(&path).is_err());
    }
}
